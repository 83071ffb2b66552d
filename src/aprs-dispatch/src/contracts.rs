// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! External-collaborator contracts (C11): the traits a host program
//! implements to plug its own message handling, reply delivery and
//! crash notification into the pipeline. Expressed as `async-trait`
//! traits so a host implementation may do its own I/O (database lookups,
//! HTTP calls) while handling a message.

use std::path::Path;

use async_trait::async_trait;

/// Outcome of [`Parser::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    Ok,
    Error,
    Ignore,
}

/// Parses an inbound message body into a host-defined response object.
#[async_trait]
pub trait Parser: Send + Sync {
    /// Opaque payload handed on to [`Generator`] and [`PostProcessor`].
    type Response: Send + Sync;

    async fn parse(&self, text: &str, from_callsign: &str) -> (ParseStatus, String, Option<Self::Response>);
}

/// Turns a parsed response object into reply text.
#[async_trait]
pub trait Generator<R>: Send + Sync
where
    R: Send + Sync,
{
    async fn generate(&self, response: &R) -> (bool, String);
}

/// Runs after a reply has been sent; failures are logged, never fatal.
#[async_trait]
pub trait PostProcessor<R>: Send + Sync
where
    R: Send + Sync,
{
    async fn post(&self, session_handle: &str, response: &R) -> bool;
}

/// Sends a crash/exception notification out of band (email, Apprise, etc).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        header: &str,
        body: &str,
        attachment_path: Option<&Path>,
        config_path: Option<&Path>,
    ) -> bool;
}

/// The pipeline's view of the transport: send one raw outbound line.
/// Kept separate from `aprs_transport::Transport` so this crate never
/// depends on the transport crate directly; `aprs-bot` wires a concrete
/// `Transport` handle into this trait.
#[async_trait]
pub trait LineSender: Send + Sync {
    async fn send_line(&self, line: &str);
}
