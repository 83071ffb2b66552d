// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Persistent outgoing-message counter (C2): a single integer persisted
//! to a plain-text file, best-effort on write, defaulting to zero on any
//! read failure.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{info, warn};

const WRAP_AT: u32 = 677;

struct State {
    value: u32,
}

/// Monotonic (mod 677) outgoing-message counter shared between the
/// dispatch pipeline (advances it) and the supervisor (flushes it).
pub struct OutboundCounter {
    path: PathBuf,
    state: Mutex<State>,
}

impl OutboundCounter {
    /// Read the counter from `path`. Any error (missing file, unreadable,
    /// non-integer content) starts the counter at 0 and logs once.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let value = match std::fs::read_to_string(&path) {
            Ok(contents) => match contents.trim().parse::<u32>() {
                Ok(v) => v % WRAP_AT,
                Err(_) => {
                    info!(
                        "counter file {} does not contain an integer; starting at 0",
                        path.display()
                    );
                    0
                }
            },
            Err(_) => {
                info!(
                    "cannot read counter file {}; starting at 0",
                    path.display()
                );
                0
            }
        };
        Self {
            path,
            state: Mutex::new(State { value }),
        }
    }

    pub fn get(&self) -> u32 {
        self.state.lock().expect("counter mutex poisoned").value
    }

    pub fn set(&self, value: u32) {
        self.state.lock().expect("counter mutex poisoned").value = value % WRAP_AT;
    }

    /// Best-effort write of the current value back to disk. Never panics;
    /// logs and swallows I/O errors.
    pub fn flush(&self) {
        self.flush_to(&self.path);
    }

    fn flush_to(&self, path: &Path) {
        let value = self.get();
        if let Err(e) = std::fs::write(path, value.to_string()) {
            warn!("cannot write counter file {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_missing_file_starts_at_zero() {
        let counter = OutboundCounter::load("/nonexistent/path/to/counter.txt");
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn flush_then_load_is_idempotent() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!(
            "aprs-core-counter-test-{:?}.txt",
            std::thread::current().id()
        ));
        {
            let mut f = std::fs::File::create(&path).unwrap();
            write!(f, "bogus").unwrap();
        }
        let counter = OutboundCounter::load(&path);
        assert_eq!(counter.get(), 0);
        counter.set(42);
        counter.flush();

        let reloaded = OutboundCounter::load(&path);
        assert_eq!(reloaded.get(), 42);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn set_wraps_modulo_677() {
        let dir = std::env::temp_dir();
        let path = dir.join("aprs-core-counter-wrap-test.txt");
        let counter = OutboundCounter::load(&path);
        counter.set(677);
        assert_eq!(counter.get(), 0);
        counter.set(700);
        assert_eq!(counter.get(), 700 % 677);
        let _ = std::fs::remove_file(&path);
    }
}
