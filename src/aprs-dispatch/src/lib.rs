// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Dispatch pipeline and external-collaborator contracts for the APRS-IS
//! messaging bot (C7, C11).

pub mod contracts;
pub mod pipeline;

pub use contracts::{Generator, LineSender, Notifier, ParseStatus, Parser, PostProcessor};
pub use pipeline::{Pipeline, PipelineConfig};
