// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Shared data model and pure-logic building blocks for the APRS-IS
//! messaging bot: the dedup cache, persistent counter, message-number
//! encoder, text splitter and frame codec. Nothing in this crate touches
//! the network or the filesystem beyond the counter's own file.

pub mod codec;
pub mod counter;
pub mod dedup;
pub mod encoder;
pub mod error;
pub mod model;
pub mod splitter;

pub use codec::{format_ack, format_beacon, format_bulletin, format_message, parse_inbound_line, reply_ack_tag};
pub use counter::OutboundCounter;
pub use dedup::DedupCache;
pub use encoder::{encode, next_counter};
pub use error::{CoreError, DynResult};
pub use model::{FrameFormat, InboundFrame, OutgoingSegment, RequestKey, ResponseKind};
pub use splitter::split;
