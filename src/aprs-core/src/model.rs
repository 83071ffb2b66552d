// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Shared data model: inbound frames, request fingerprints and outbound
//! segments.

use md5::{Digest, Md5};

/// Frame format as reported by the upstream APRS-IS line parser.
///
/// Only `Message` frames are ever handed to the dispatch pipeline; anything
/// else is surfaced here so callers can log/ignore it without the codec
/// needing to know about dispatch policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameFormat {
    Message,
    Other(String),
}

/// The receipt kind carried by a frame's `response` field, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Ack,
    Rej,
}

impl ResponseKind {
    fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ack" => Some(Self::Ack),
            "rej" => Some(Self::Rej),
            _ => None,
        }
    }
}

/// A parsed APRS text frame addressed to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    pub addressee: String,
    pub from_callsign: String,
    pub message_text: String,
    pub msg_no: Option<String>,
    pub ack_msg_no: Option<String>,
    pub format: FrameFormat,
    pub response: Option<ResponseKind>,
}

impl InboundFrame {
    /// `true` when the sender uses the "reply-ack" (new-style) format.
    pub fn is_reply_ack(&self) -> bool {
        self.ack_msg_no.is_some()
    }

    /// `true` when the sender supplied a message number (old or new style).
    pub fn has_msg_no(&self) -> bool {
        self.msg_no.is_some()
    }

    /// `true` when this frame is itself a receipt (ack/rej) and must not be
    /// treated as a request.
    pub fn is_receipt(&self) -> bool {
        matches!(self.response, Some(ResponseKind::Ack) | Some(ResponseKind::Rej))
    }

    pub fn set_response(&mut self, raw: Option<&str>) {
        self.response = raw.and_then(ResponseKind::from_str);
    }
}

/// Fingerprint used for duplicate suppression: `(md5(message_text),
/// from_callsign, msg_no-or-null)`. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    message_digest: String,
    from_callsign: String,
    msg_no: Option<String>,
}

impl RequestKey {
    pub fn new(message_text: &str, from_callsign: &str, msg_no: Option<&str>) -> Self {
        let mut hasher = Md5::new();
        hasher.update(message_text.as_bytes());
        let message_digest = hex::encode(hasher.finalize());
        Self {
            message_digest,
            from_callsign: from_callsign.to_string(),
            msg_no: msg_no.map(str::to_string),
        }
    }

    pub fn from_frame(frame: &InboundFrame) -> Self {
        Self::new(
            &frame.message_text,
            &frame.from_callsign,
            frame.msg_no.as_deref(),
        )
    }
}

/// One APRS payload, already within the 67-byte budget including any
/// numbering/enumeration suffix the codec will append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingSegment(String);

impl OutgoingSegment {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
