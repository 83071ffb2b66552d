// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Example `Parser`/`Generator`/`PostProcessor`/`Notifier` implementations
//! demonstrating the C11 contracts, used as the binary's default handlers
//! and by the dryrun harness: a four-keyword demo command set
//! (`greetings`, `hello`, `lorem`, `error`), kept deliberately crude and
//! meant to be replaced by a real implementation.

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use aprs_dispatch::{Generator, Notifier, ParseStatus, Parser, PostProcessor};

const LOREM_IPSUM: &str = "Lorem ipsum dolor sit amet, consetetur sadipscing elitr, sed diam nonumy eirmod tempor invidunt ut labore et dolore magna aliquyam erat, sed diam voluptua. At vero eos et accusam et justo duo dolores et ea rebum. Stet clita kasd gubergren, no sea takimata sanctus est Lorem ipsum dolor sit amet.";

/// Parsed intent shared between [`DemoParser`] and [`DemoGenerator`].
#[derive(Debug, Clone)]
pub struct DemoResponse {
    pub from_callsign: String,
    pub command_code: String,
}

pub struct DemoParser;

#[async_trait]
impl Parser for DemoParser {
    type Response = DemoResponse;

    async fn parse(&self, text: &str, from_callsign: &str) -> (ParseStatus, String, Option<DemoResponse>) {
        let lower = text.to_lowercase();
        let mut command_code = String::new();
        let mut success = false;
        let mut error_message = String::new();

        if lower.contains("greetings") {
            command_code = "greetme".to_string();
            success = true;
        }
        if lower.contains("hello") {
            command_code = "sayhello".to_string();
            success = true;
        }
        if lower.contains("lorem") {
            command_code = "loremipsum".to_string();
            success = true;
        }
        if lower.contains("error") {
            error_message = "Triggered input processor error".to_string();
            success = false;
        }

        let response = DemoResponse {
            from_callsign: from_callsign.to_string(),
            command_code,
        };

        if success {
            (ParseStatus::Ok, String::new(), Some(response))
        } else {
            (ParseStatus::Error, error_message, None)
        }
    }
}

pub struct DemoGenerator;

#[async_trait]
impl Generator<DemoResponse> for DemoGenerator {
    async fn generate(&self, response: &DemoResponse) -> (bool, String) {
        match response.command_code.as_str() {
            "greetme" => (true, format!("Hello {}", response.from_callsign)),
            "sayhello" => (true, "Hello World".to_string()),
            "loremipsum" => (true, LOREM_IPSUM.to_string()),
            _ => (false, String::new()),
        }
    }
}

pub struct DemoPostProcessor;

#[async_trait]
impl PostProcessor<DemoResponse> for DemoPostProcessor {
    async fn post(&self, session_handle: &str, response: &DemoResponse) -> bool {
        info!(
            "post-processed '{}' for {} on session {}",
            response.command_code, response.from_callsign, session_handle
        );
        true
    }
}

/// Logs the crash report instead of dispatching to a real notification
/// service (Apprise, email, etc). A production deployment wires a real
/// `Notifier` here instead.
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn notify(&self, header: &str, body: &str, attachment_path: Option<&Path>, _config_path: Option<&Path>) -> bool {
        match attachment_path {
            Some(path) => info!("crash notification: {} — {} (attachment: {})", header, body, path.display()),
            None => info!("crash notification: {} — {}", header, body),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn greetings_keyword_greets_the_sender() {
        let parser = DemoParser;
        let (status, _, response) = parser.parse("greetings please", "DF1JSL-1").await;
        assert_eq!(status, ParseStatus::Ok);
        let response = response.unwrap();
        let generator = DemoGenerator;
        let (ok, text) = generator.generate(&response).await;
        assert!(ok);
        assert_eq!(text, "Hello DF1JSL-1");
    }

    #[tokio::test]
    async fn hello_keyword_sends_hello_world() {
        let parser = DemoParser;
        let (status, _, response) = parser.parse("hello there", "N0CALL").await;
        assert_eq!(status, ParseStatus::Ok);
        let generator = DemoGenerator;
        let (ok, text) = generator.generate(&response.unwrap()).await;
        assert!(ok);
        assert_eq!(text, "Hello World");
    }

    #[tokio::test]
    async fn lorem_keyword_sends_long_text() {
        let parser = DemoParser;
        let (status, _, response) = parser.parse("lorem", "N0CALL").await;
        assert_eq!(status, ParseStatus::Ok);
        let generator = DemoGenerator;
        let (_, text) = generator.generate(&response.unwrap()).await;
        assert!(text.len() > 67);
    }

    #[tokio::test]
    async fn error_keyword_reports_the_custom_message() {
        let parser = DemoParser;
        let (status, message, response) = parser.parse("error", "N0CALL").await;
        assert_eq!(status, ParseStatus::Error);
        assert_eq!(message, "Triggered input processor error");
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn unrecognized_text_yields_an_empty_error_message() {
        let parser = DemoParser;
        let (status, message, _) = parser.parse("gibberish", "N0CALL").await;
        assert_eq!(status, ParseStatus::Error);
        assert!(message.is_empty());
    }
}
