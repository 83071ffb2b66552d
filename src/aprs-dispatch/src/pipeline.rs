// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Dispatch Pipeline (C7): the per-inbound-message state machine. Gates on
//! addressee/format/response, dedups, acks old-style requests before
//! parsing, parses then generates (falling back to the default error
//! message on any failure), splits, numbers and sends each segment,
//! records the request in the dedup cache exactly once, then runs the
//! post-processor if the host supplied one.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use aprs_core::{format_ack, format_message, next_counter, reply_ack_tag, split, DedupCache, FrameFormat, InboundFrame, OutboundCounter, RequestKey};

use crate::contracts::{Generator, LineSender, ParseStatus, Parser, PostProcessor};

/// Worst-case width of the numbering suffix `codec::format_message` appends
/// after a segment is already at budget: a reply-ack tail (`{AA}ZZ`).
/// Old-style acks only cost 3 bytes (`{AA`), but reserving the wider figure
/// keeps the reservation correct without knowing the tail shape up front.
const NUMBERING_SUFFIX_WIDTH: usize = 6;

/// Tuning knobs the pipeline needs from configuration
/// (`client_config`/`message_delay`/`dupe_detection`).
pub struct PipelineConfig {
    pub bot_callsign: String,
    pub tocall: String,
    pub default_error_message: String,
    pub enumerate_segments: bool,
    pub segment_budget: usize,
    pub ack_delay: Duration,
    pub inter_packet_delay: Duration,
}

/// Wires the dedup cache, counter and external collaborators together.
/// Generic over the host's `Parser`/`Generator`/`PostProcessor`/`LineSender`
/// implementations so the pipeline stays fully static-dispatched.
pub struct Pipeline<P, G, PP, S>
where
    P: Parser,
    G: Generator<P::Response>,
    PP: PostProcessor<P::Response>,
    S: LineSender,
{
    cfg: PipelineConfig,
    cache: Arc<DedupCache>,
    counter: Arc<OutboundCounter>,
    parser: P,
    generator: G,
    post_processor: Option<PP>,
    sender: Arc<S>,
}

impl<P, G, PP, S> Pipeline<P, G, PP, S>
where
    P: Parser,
    G: Generator<P::Response>,
    PP: PostProcessor<P::Response>,
    S: LineSender,
{
    pub fn new(
        cfg: PipelineConfig,
        cache: Arc<DedupCache>,
        counter: Arc<OutboundCounter>,
        parser: P,
        generator: G,
        post_processor: Option<PP>,
        sender: Arc<S>,
    ) -> Self {
        Self {
            cfg,
            cache,
            counter,
            parser,
            generator,
            post_processor,
            sender,
        }
    }

    /// Run one inbound frame through the full pipeline. Never panics;
    /// every external-collaborator failure degrades to the configured
    /// default error message or a logged warning.
    pub async fn handle(&self, frame: InboundFrame) {
        if frame.addressee != self.cfg.bot_callsign
            || frame.format != FrameFormat::Message
            || frame.message_text.is_empty()
            || frame.is_receipt()
        {
            return;
        }

        let key = RequestKey::from_frame(&frame);
        if self.cache.has(&key) {
            debug!("duplicate request from {}, ignoring", frame.from_callsign);
            return;
        }

        let old_style_ack = frame.has_msg_no() && !frame.is_reply_ack();
        if old_style_ack {
            if let Some(msg_no) = frame.msg_no.as_deref() {
                let ack_line = format_ack(&self.cfg.bot_callsign, &self.cfg.tocall, &frame.from_callsign, msg_no);
                self.sender.send_line(&ack_line).await;
                tokio::time::sleep(self.cfg.ack_delay).await;
            }
        }

        let (status, error_text, response) = self.parser.parse(&frame.message_text, &frame.from_callsign).await;

        if status == ParseStatus::Ignore {
            self.cache.put(key);
            return;
        }

        let outcome_text = match status {
            ParseStatus::Error => {
                if error_text.is_empty() {
                    self.cfg.default_error_message.clone()
                } else {
                    error_text
                }
            }
            ParseStatus::Ok => match response.as_ref() {
                Some(r) => {
                    let (ok, text) = self.generator.generate(r).await;
                    if ok {
                        text
                    } else {
                        self.cfg.default_error_message.clone()
                    }
                }
                None => self.cfg.default_error_message.clone(),
            },
            ParseStatus::Ignore => unreachable!("handled above"),
        };

        let numbering_active = frame.has_msg_no();
        // A numbered reply gets a `{AA` (3 bytes) or `{AA}ZZ` (6 bytes)
        // suffix appended after splitting, so the budget handed to the
        // splitter must already have that worst case carved out.
        let split_budget = if numbering_active {
            self.cfg.segment_budget.saturating_sub(NUMBERING_SUFFIX_WIDTH).max(1)
        } else {
            self.cfg.segment_budget
        };
        let segments = split(&outcome_text, split_budget, self.cfg.enumerate_segments);
        let mut counter_value = self.counter.get();
        for segment in &segments {
            let numbering = if numbering_active {
                let (alpha, next) = next_counter(counter_value);
                counter_value = next;
                let reply_ack = frame.ack_msg_no.as_deref().map(reply_ack_tag);
                Some((alpha, reply_ack))
            } else {
                None
            };
            let numbering_ref = numbering.as_ref().map(|(a, r)| (a.as_str(), r.as_deref()));
            let line = format_message(
                &self.cfg.bot_callsign,
                &self.cfg.tocall,
                &frame.from_callsign,
                segment,
                numbering_ref,
            );
            self.sender.send_line(&line).await;
            tokio::time::sleep(self.cfg.inter_packet_delay).await;
        }
        if numbering_active {
            self.counter.set(counter_value);
        }

        self.cache.put(key);

        if let (Some(post_processor), Some(response)) = (&self.post_processor, response.as_ref()) {
            if !post_processor.post(&self.cfg.bot_callsign, response).await {
                warn!("post-processor reported failure for request from {}", frame.from_callsign);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    struct EchoParser;

    #[async_trait]
    impl Parser for EchoParser {
        type Response = String;

        async fn parse(&self, text: &str, _from_callsign: &str) -> (ParseStatus, String, Option<String>) {
            if text == "ignore" {
                return (ParseStatus::Ignore, String::new(), None);
            }
            if text == "bad" {
                return (ParseStatus::Error, "custom error".to_string(), None);
            }
            (ParseStatus::Ok, String::new(), Some(text.to_string()))
        }
    }

    struct EchoGenerator;

    #[async_trait]
    impl Generator<String> for EchoGenerator {
        async fn generate(&self, response: &String) -> (bool, String) {
            (true, format!("you said: {response}"))
        }
    }

    struct RecordingPostProcessor(Arc<StdMutex<Vec<String>>>);

    #[async_trait]
    impl PostProcessor<String> for RecordingPostProcessor {
        async fn post(&self, _session_handle: &str, response: &String) -> bool {
            self.0.lock().unwrap().push(response.clone());
            true
        }
    }

    struct RecordingSender(Arc<StdMutex<Vec<String>>>);

    #[async_trait]
    impl LineSender for RecordingSender {
        async fn send_line(&self, line: &str) {
            self.0.lock().unwrap().push(line.to_string());
        }
    }

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            bot_callsign: "COAC".to_string(),
            tocall: "APRS".to_string(),
            default_error_message: "sorry, something went wrong".to_string(),
            enumerate_segments: false,
            segment_budget: 67,
            ack_delay: Duration::from_millis(0),
            inter_packet_delay: Duration::from_millis(0),
        }
    }

    fn test_frame(text: &str, msg_no: Option<&str>, ack_msg_no: Option<&str>) -> InboundFrame {
        InboundFrame {
            addressee: "COAC".to_string(),
            from_callsign: "DF1JSL-1".to_string(),
            message_text: text.to_string(),
            msg_no: msg_no.map(str::to_string),
            ack_msg_no: ack_msg_no.map(str::to_string),
            format: FrameFormat::Message,
            response: None,
        }
    }

    #[tokio::test]
    async fn old_style_request_is_acked_then_answered_and_numbered() {
        let lines = Arc::new(StdMutex::new(Vec::new()));
        let sender = Arc::new(RecordingSender(lines.clone()));
        let pipeline = Pipeline::new(
            test_config(),
            Arc::new(DedupCache::new(100, Duration::from_secs(60))),
            Arc::new(OutboundCounter::load("/nonexistent/counter-test-a.txt")),
            EchoParser,
            EchoGenerator,
            None::<RecordingPostProcessor>,
            sender,
        );

        pipeline.handle(test_frame("hello", Some("AB"), None)).await;

        let sent = lines.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], "COAC>APRS::DF1JSL-1 :ackAB");
        assert_eq!(sent[1], "COAC>APRS::DF1JSL-1 :you said: hello{AA");
    }

    #[tokio::test]
    async fn reply_ack_request_skips_separate_ack_and_appends_tail() {
        let lines = Arc::new(StdMutex::new(Vec::new()));
        let sender = Arc::new(RecordingSender(lines.clone()));
        let pipeline = Pipeline::new(
            test_config(),
            Arc::new(DedupCache::new(100, Duration::from_secs(60))),
            Arc::new(OutboundCounter::load("/nonexistent/counter-test-b.txt")),
            EchoParser,
            EchoGenerator,
            None::<RecordingPostProcessor>,
            sender,
        );

        pipeline.handle(test_frame("hello", Some("AE"), Some("ZZ"))).await;

        let sent = lines.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], "COAC>APRS::DF1JSL-1 :you said: hello{AA}ZZ");
    }

    #[tokio::test]
    async fn multi_segment_reply_ack_reply_stays_within_line_budget() {
        let lines = Arc::new(StdMutex::new(Vec::new()));
        let sender = Arc::new(RecordingSender(lines.clone()));
        let pipeline = Pipeline::new(
            test_config(),
            Arc::new(DedupCache::new(100, Duration::from_secs(60))),
            Arc::new(OutboundCounter::load("/nonexistent/counter-test-h.txt")),
            EchoParser,
            EchoGenerator,
            None::<RecordingPostProcessor>,
            sender,
        );

        let long_text = "lorem ipsum dolor sit amet ".repeat(6);
        pipeline.handle(test_frame(long_text.trim(), Some("AE"), Some("ZZ"))).await;

        let sent = lines.lock().unwrap().clone();
        assert!(sent.len() > 1, "expected the reply to split into multiple segments");
        for line in &sent {
            assert!(line.len() <= 67, "line exceeded the APRS-IS budget: {line:?} ({} bytes)", line.len());
            assert!(line.contains("{A"), "numbered segment missing its tag: {line:?}");
        }
    }

    #[tokio::test]
    async fn parser_error_falls_back_to_custom_message() {
        let lines = Arc::new(StdMutex::new(Vec::new()));
        let sender = Arc::new(RecordingSender(lines.clone()));
        let pipeline = Pipeline::new(
            test_config(),
            Arc::new(DedupCache::new(100, Duration::from_secs(60))),
            Arc::new(OutboundCounter::load("/nonexistent/counter-test-c.txt")),
            EchoParser,
            EchoGenerator,
            None::<RecordingPostProcessor>,
            sender,
        );

        pipeline.handle(test_frame("bad", None, None)).await;

        let sent = lines.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("custom error"));
    }

    #[tokio::test]
    async fn parser_ignore_sends_nothing_but_still_dedupes() {
        let lines = Arc::new(StdMutex::new(Vec::new()));
        let sender = Arc::new(RecordingSender(lines.clone()));
        let cache = Arc::new(DedupCache::new(100, Duration::from_secs(60)));
        let pipeline = Pipeline::new(
            test_config(),
            cache.clone(),
            Arc::new(OutboundCounter::load("/nonexistent/counter-test-d.txt")),
            EchoParser,
            EchoGenerator,
            None::<RecordingPostProcessor>,
            sender,
        );

        pipeline.handle(test_frame("ignore", None, None)).await;

        assert!(lines.lock().unwrap().is_empty());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn receipt_frames_are_never_processed() {
        let lines = Arc::new(StdMutex::new(Vec::new()));
        let sender = Arc::new(RecordingSender(lines.clone()));
        let pipeline = Pipeline::new(
            test_config(),
            Arc::new(DedupCache::new(100, Duration::from_secs(60))),
            Arc::new(OutboundCounter::load("/nonexistent/counter-test-e.txt")),
            EchoParser,
            EchoGenerator,
            None::<RecordingPostProcessor>,
            sender,
        );

        let mut frame = test_frame("hello", None, None);
        frame.set_response(Some("ack"));
        pipeline.handle(frame).await;

        assert!(lines.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_request_is_only_answered_once() {
        let lines = Arc::new(StdMutex::new(Vec::new()));
        let sender = Arc::new(RecordingSender(lines.clone()));
        let pipeline = Pipeline::new(
            test_config(),
            Arc::new(DedupCache::new(100, Duration::from_secs(60))),
            Arc::new(OutboundCounter::load("/nonexistent/counter-test-f.txt")),
            EchoParser,
            EchoGenerator,
            None::<RecordingPostProcessor>,
            sender,
        );

        pipeline.handle(test_frame("hello", None, None)).await;
        pipeline.handle(test_frame("hello", None, None)).await;

        assert_eq!(lines.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn post_processor_runs_after_reply_is_sent() {
        let lines = Arc::new(StdMutex::new(Vec::new()));
        let posted = Arc::new(StdMutex::new(Vec::new()));
        let sender = Arc::new(RecordingSender(lines));
        let pipeline = Pipeline::new(
            test_config(),
            Arc::new(DedupCache::new(100, Duration::from_secs(60))),
            Arc::new(OutboundCounter::load("/nonexistent/counter-test-g.txt")),
            EchoParser,
            EchoGenerator,
            Some(RecordingPostProcessor(posted.clone())),
            sender,
        );

        pipeline.handle(test_frame("hello", None, None)).await;

        assert_eq!(posted.lock().unwrap().as_slice(), ["hello".to_string()]);
    }
}
