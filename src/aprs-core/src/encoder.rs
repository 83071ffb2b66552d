// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Two-letter alphanumeric message-number encoder (C5): `c1 = n / 26`,
//! `c2 = n mod 26`, encoded as `(c1+'A')(c2+'A')`.

/// Encode `n` (expected in `0..=675`) as a two-uppercase-letter counter.
/// Values outside that range still compute mechanically (callers are
/// expected to wrap per [`next_counter`] before calling this).
pub fn encode(n: u32) -> String {
    let c1 = (n / 26) % 26;
    let c2 = n % 26;
    let first = (b'A' + c1 as u8) as char;
    let second = (b'A' + c2 as u8) as char;
    format!("{first}{second}")
}

/// Compute the alpha counter for the current value of `n`, and the next
/// counter value to store. Wraps to 0 once `n` would exceed 676 or the
/// just-emitted alpha is `"ZZ"`.
pub fn next_counter(n: u32) -> (String, u32) {
    let alpha = encode(n);
    let mut next = n + 1;
    if next > 676 || alpha == "ZZ" {
        next = 0;
    }
    (alpha, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn encode_zero_is_aa() {
        assert_eq!(encode(0), "AA");
    }

    #[test]
    fn encode_675_is_zz() {
        assert_eq!(encode(675), "ZZ");
    }

    #[test]
    fn encode_is_injective_on_0_to_675() {
        let mut seen = HashSet::new();
        for n in 0..=675 {
            let alpha = encode(n);
            assert_eq!(alpha.len(), 2);
            assert!(alpha.chars().all(|c| c.is_ascii_uppercase()));
            assert!(seen.insert(alpha), "duplicate encoding for n={n}");
        }
    }

    #[test]
    fn next_counter_wraps_at_675() {
        let (alpha, next) = next_counter(675);
        assert_eq!(alpha, "ZZ");
        assert_eq!(next, 0);
    }

    #[test]
    fn next_counter_wraps_at_676() {
        let (_, next) = next_counter(676);
        assert_eq!(next, 0);
    }

    #[test]
    fn next_counter_advances_normally() {
        let (alpha, next) = next_counter(0);
        assert_eq!(alpha, "AA");
        assert_eq!(next, 1);
    }
}
