// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Frame Codec (C4): parses inbound APRS-IS text lines into
//! [`InboundFrame`]s and formats outbound directed-message/ack/bulletin/
//! beacon lines.
//!
//! Field names and formatting match the `addresse`/`message_text`/`msgNo`/
//! `ackMsgNo`/`format`/`response`/`from` keys a typical APRS-IS parsing
//! library exposes, and the directed-message/ack/beacon/bulletin line
//! templates amateur APRS-IS bots commonly emit.

use crate::model::{FrameFormat, InboundFrame};

/// Parse one APRS-IS line into an [`InboundFrame`]. Returns `None` for
/// server comment lines (`#...`), malformed lines, and anything that isn't
/// a `:`-format (directed message) frame — position reports, bulletins and
/// other frame types are outside this bot's inbound scope.
pub fn parse_inbound_line(line: &str) -> Option<InboundFrame> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (from_callsign, rest) = line.split_once('>')?;
    // rest is "DEST,PATH:INFO" (or "DEST:INFO" with no digipeater path).
    let colon_idx = rest.find(':')?;
    let info = &rest[colon_idx + 1..];

    if !info.starts_with(':') {
        return None; // not a message-format frame
    }
    let body = &info[1..];
    if body.len() < 10 || body.as_bytes()[9] != b':' {
        return None; // addressee field must be exactly 9 chars + ':'
    }
    let addressee = body[..9].trim_end().to_string();
    let payload = &body[10..];

    let lower_payload = payload.to_ascii_lowercase();
    if lower_payload.starts_with("ack") || lower_payload.starts_with("rej") {
        let mut frame = InboundFrame {
            addressee,
            from_callsign: from_callsign.to_ascii_uppercase(),
            message_text: String::new(),
            msg_no: None,
            ack_msg_no: None,
            format: FrameFormat::Message,
            response: None,
        };
        frame.set_response(Some(&lower_payload[..3]));
        return Some(frame);
    }

    let (message_text, msg_no, ack_msg_no) = match payload.split_once('{') {
        Some((text, tail)) => match tail.split_once('}') {
            Some((msg_no, ack)) => (text.to_string(), Some(msg_no.to_string()), Some(ack.to_string())),
            None => (text.to_string(), Some(tail.to_string()), None),
        },
        None => (payload.to_string(), None, None),
    };

    Some(InboundFrame {
        addressee,
        from_callsign: from_callsign.to_ascii_uppercase(),
        message_text,
        msg_no,
        ack_msg_no,
        format: FrameFormat::Message,
        response: None,
    })
}

fn pad_field(field: &str) -> String {
    format!("{field:<9.9}")
}

/// Format a directed-message line, optionally with a numbering suffix
/// (`{AA`) and, for reply-ack replies, a `}XX` tail.
pub fn format_message(
    from: &str,
    tocall: &str,
    dest: &str,
    text: &str,
    numbering: Option<(&str, Option<&str>)>,
) -> String {
    let mut line = format!("{from}>{tocall}::{}:{text}", pad_field(dest));
    if let Some((alpha, reply_ack)) = numbering {
        line.push('{');
        line.push_str(alpha);
        if let Some(tag) = reply_ack {
            line.push('}');
            line.push_str(tag);
        }
    }
    line
}

/// Format a standalone ack line (old-style, separate from the reply).
pub fn format_ack(from: &str, tocall: &str, dest: &str, msg_no: &str) -> String {
    format!("{from}>{tocall}::{}:ack{msg_no}", pad_field(dest))
}

/// Format an addressed bulletin line (`BLNxxx` destination id).
pub fn format_bulletin(from: &str, tocall: &str, bln_id: &str, text: &str) -> String {
    format!("{from}>{tocall}::{}:{text}", pad_field(bln_id))
}

/// Format a beacon/position line. `altitude_ft` is zero-padded to six
/// digits; values needing more than six digits are truncated to the
/// least-significant six (see DESIGN.md Open Questions for this choice).
pub fn format_beacon(
    from: &str,
    tocall: &str,
    lat: &str,
    table: char,
    lon: &str,
    symbol: char,
    callsign: &str,
    version: &str,
    altitude_ft: i64,
) -> String {
    let alt6 = {
        let digits = altitude_ft.max(0).to_string();
        if digits.len() > 6 {
            digits[digits.len() - 6..].to_string()
        } else {
            format!("{altitude_ft:06}")
        }
    };
    format!("{from}>{tocall}:={lat}{table}{lon}{symbol}{callsign} {version} /A={alt6}")
}

/// Given the reply-ack tag from an inbound frame's `msg_no`, produce the
/// `}XX` tail: use up to the first two characters of the inbound tag,
/// never inventing padding — a one-character tag yields a one-character
/// tail (see DESIGN.md Open Questions).
pub fn reply_ack_tag(inbound_msg_no: &str) -> String {
    inbound_msg_no.chars().take(2).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directed_message_with_old_style_msg_no() {
        let frame = parse_inbound_line("DF1JSL-1>APRS::COAC     :greetings{AB").unwrap();
        assert_eq!(frame.addressee, "COAC");
        assert_eq!(frame.from_callsign, "DF1JSL-1");
        assert_eq!(frame.message_text, "greetings");
        assert_eq!(frame.msg_no.as_deref(), Some("AB"));
        assert_eq!(frame.ack_msg_no, None);
        assert!(!frame.is_reply_ack());
    }

    #[test]
    fn parses_reply_ack_format() {
        let frame = parse_inbound_line("DF1JSL-1>APRS::COAC     :hello{AE}ZZ").unwrap();
        assert_eq!(frame.message_text, "hello");
        assert_eq!(frame.msg_no.as_deref(), Some("AE"));
        assert_eq!(frame.ack_msg_no.as_deref(), Some("ZZ"));
        assert!(frame.is_reply_ack());
    }

    #[test]
    fn parses_frame_without_msg_no() {
        let frame = parse_inbound_line("DF1JSL-1>APRS::COAC     :just text").unwrap();
        assert_eq!(frame.message_text, "just text");
        assert!(frame.msg_no.is_none());
        assert!(!frame.has_msg_no());
    }

    #[test]
    fn comment_lines_yield_no_frame() {
        assert!(parse_inbound_line("# logresp N0CALL verified, server TEST").is_none());
    }

    #[test]
    fn position_frames_yield_no_frame() {
        assert!(parse_inbound_line("N0CALL>APRS:=5150.34N/00819.60E?Test").is_none());
    }

    #[test]
    fn ack_receipt_line_is_recognized_as_response() {
        let frame = parse_inbound_line("DF1JSL-1>APRS::COAC     :ackAB").unwrap();
        assert!(frame.is_receipt());
    }

    #[test]
    fn format_message_round_trips_addressee_and_text() {
        let line = format_message("COAC", "APRS", "DF1JSL-1", "Hello DF1JSL-1", Some(("AA", None)));
        assert_eq!(line, "COAC>APRS::DF1JSL-1 :Hello DF1JSL-1{AA");
        let parsed = parse_inbound_line(&line).unwrap();
        assert_eq!(parsed.addressee, "DF1JSL-1");
        assert_eq!(parsed.message_text, "Hello DF1JSL-1");
        assert_eq!(parsed.msg_no.as_deref(), Some("AA"));
    }

    #[test]
    fn format_message_with_reply_ack_tail() {
        let line = format_message("COAC", "APRS", "DF1JSL-1", "hello", Some(("AF", Some("AE"))));
        assert_eq!(line, "COAC>APRS::DF1JSL-1 :hello{AF}AE");
    }

    #[test]
    fn format_ack_matches_spec_template() {
        let line = format_ack("COAC", "APRS", "DF1JSL-1", "AB");
        assert_eq!(line, "COAC>APRS::DF1JSL-1 :ackAB");
    }

    #[test]
    fn format_bulletin_pads_bln_id_to_nine() {
        let line = format_bulletin("COAC", "APRS", "BLN0DEMO", "Welcome!");
        assert_eq!(line, "COAC>APRS::BLN0DEMO :Welcome!");
    }

    #[test]
    fn format_beacon_matches_scenario_six() {
        let line = format_beacon("COAC", "APRS", "5150.34N", '/', "00819.60E", '?', "COAC", "v1.0", 0);
        assert_eq!(line, "COAC>APRS:=5150.34N/00819.60E?COAC v1.0 /A=000000");
    }

    #[test]
    fn reply_ack_tag_pads_never_invents() {
        assert_eq!(reply_ack_tag("ZZ"), "ZZ");
        assert_eq!(reply_ack_tag("Z"), "Z");
        assert_eq!(reply_ack_tag(""), "");
    }
}
