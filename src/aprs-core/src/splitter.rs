// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Text splitter (C6): breaks an arbitrary-length reply into APRS payloads
//! that stay within budget once the codec appends numbering, and
//! optionally decorates each payload with a `(k/N)` enumeration marker.
//!
//! Prefers whitespace boundaries, hard-splits overlong tokens, never emits
//! an empty payload, and stays idempotent on inputs already within budget.

/// Split `text` into payloads of at most `budget` bytes each, optionally
/// reserving room for a `(k/N)` enumeration marker within that same
/// budget. `budget` should already have any numbering-suffix length
/// subtracted by the caller (the splitter doesn't know whether the
/// dispatch pipeline will append a numbering suffix).
pub fn split(text: &str, budget: usize, enumerate: bool) -> Vec<String> {
    assert!(budget > 0, "split budget must be positive");

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if !enumerate {
        return greedy_split(trimmed, budget);
    }

    // Enumeration markers shrink the usable budget, and their own length
    // depends on the final segment count — iterate a few times until the
    // segment count (and thus marker width) stabilizes.
    let mut effective_budget = budget;
    let mut segments = greedy_split(trimmed, effective_budget);
    for _ in 0..3 {
        let marker_len = enumeration_marker_len(segments.len());
        let candidate_budget = budget.saturating_sub(marker_len).max(1);
        if candidate_budget == effective_budget {
            break;
        }
        effective_budget = candidate_budget;
        let resplit = greedy_split(trimmed, effective_budget);
        if resplit.len() == segments.len() {
            segments = resplit;
            break;
        }
        segments = resplit;
    }

    if segments.len() <= 1 {
        return segments;
    }

    let total = segments.len();
    segments
        .into_iter()
        .enumerate()
        .map(|(i, seg)| format!("{} ({}/{})", seg, i + 1, total))
        .collect()
}

fn enumeration_marker_len(total: usize) -> usize {
    // " (k/N)" — k and N share N's digit width in the worst case (k == N).
    let digits = total.max(1).to_string().len();
    3 + digits * 2
}

/// Greedy, whitespace-preferring splitter with hard-split fallback for
/// tokens longer than `budget`. Never returns an empty segment.
fn greedy_split(text: &str, budget: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        loop {
            let sep_len = if current.is_empty() { 0 } else { 1 };
            if current.len() + sep_len + word.len() <= budget {
                if sep_len == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                break;
            }

            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }

            if word.len() <= budget {
                current.push_str(word);
                break;
            }

            // Token itself exceeds the budget: hard-split it.
            let (head, tail) = word.split_at(budget);
            segments.push(head.to_string());
            word = tail;
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}
