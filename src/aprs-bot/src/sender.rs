// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Adapts `aprs_transport::Transport` to the dispatch pipeline's
//! `LineSender` contract, and implements simulation mode: when
//! `aprsis_simulate_send` is set, lines are logged instead of written to
//! the socket.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use aprs_dispatch::LineSender;
use aprs_transport::Transport;

pub struct TransportSender {
    transport: Arc<Transport>,
    simulate: bool,
}

impl TransportSender {
    pub fn new(transport: Arc<Transport>, simulate: bool) -> Self {
        Self { transport, simulate }
    }
}

#[async_trait]
impl LineSender for TransportSender {
    async fn send_line(&self, line: &str) {
        if self.simulate {
            info!("[simulated send] {}", line);
            return;
        }
        self.transport.send(line).await;
    }
}
