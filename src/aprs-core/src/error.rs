// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use thiserror::Error;

/// Shared error type for the `aprs-core` building blocks.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error on {0}: {1}")]
    Io(String, String),
}

/// Catch-all result type for the outer CLI/supervisor boundary.
pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
