// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Dryrun Harness: run one message through parse → generate → split
//! without touching the network, the dedup cache or the counter file, so
//! a handler can be exercised offline.

use std::path::PathBuf;

use clap::Parser;

use aprs_app::{AppConfig, ConfigFile};
use aprs_core::split;
use aprs_demo_handlers::{DemoGenerator, DemoParser};
use aprs_dispatch::{Generator, ParseStatus, Parser as DispatchParser};

const SEGMENT_BUDGET: usize = 67;

#[derive(Debug, Parser)]
#[command(about = "Run one message through the bot's handlers without touching the network")]
struct Cli {
    /// Path to configuration file; falls back to built-in defaults if omitted
    #[arg(long = "configfile", short = 'c', value_name = "FILE")]
    configfile: Option<PathBuf>,
    /// Callsign the message appears to come from
    from_callsign: String,
    /// Message body to feed to the parser
    message: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cfg = match cli.configfile {
        Some(path) => AppConfig::load_from_file(&path).unwrap_or_else(|e| {
            eprintln!("warning: {e}, falling back to default configuration");
            AppConfig::default()
        }),
        None => AppConfig::default(),
    };

    let parser = DemoParser;
    let generator = DemoGenerator;

    let (status, error_text, response) = parser.parse(&cli.message, &cli.from_callsign).await;

    let outcome_text = match status {
        ParseStatus::Ignore => {
            println!("(parser chose to ignore this message, nothing would be sent)");
            return;
        }
        ParseStatus::Error => {
            if error_text.is_empty() {
                cfg.client_config.aprs_input_parser_default_error_message.clone()
            } else {
                error_text
            }
        }
        ParseStatus::Ok => match response.as_ref() {
            Some(r) => {
                let (ok, text) = generator.generate(r).await;
                if ok {
                    text
                } else {
                    cfg.client_config.aprs_input_parser_default_error_message.clone()
                }
            }
            None => cfg.client_config.aprs_input_parser_default_error_message.clone(),
        },
    };

    let segments = split(&outcome_text, SEGMENT_BUDGET, cfg.client_config.aprs_message_enumeration);
    for (i, segment) in segments.iter().enumerate() {
        println!("[{}/{}] {}", i + 1, segments.len(), segment);
    }
}
