// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Binary-crate plumbing shared by `aprs-bot` and `aprs-bot-dryrun`: the
//! concrete `LineSender` bridge and the session supervisor loop.

pub mod sender;
pub mod supervisor;

pub use sender::TransportSender;
pub use supervisor::run;
