// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Authenticated TCP line transport to APRS-IS (C3): connect, write a
//! login line, wait up to ten lines for the server's `# logresp`, then
//! read/write lines over the split socket. `Transport` exposes
//! `connect`/`consume`/`close` as discrete steps and never retries on its
//! own — reconnect policy belongs entirely to the session supervisor, so
//! any failure here simply returns control to the caller.

use std::future::Future;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use aprs_core::{parse_inbound_line, CoreError, DynResult};

/// Compute the APRS-IS passcode for a callsign (SSID stripped, first ten
/// characters uppercased, XOR-folded, masked to 15 bits).
pub fn compute_passcode(callsign: &str) -> u16 {
    let base = callsign.split('-').next().unwrap_or(callsign);
    let upper: String = base.chars().take(10).map(|c| c.to_ascii_uppercase()).collect();
    let bytes = upper.as_bytes();

    let mut hash: u16 = 0x73e2;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= (bytes[i] as u16) << 8;
        if i + 1 < bytes.len() {
            hash ^= bytes[i + 1] as u16;
        }
        i += 2;
    }
    hash & 0x7fff
}

/// How many lines `connect` will read while looking for `# logresp` before
/// giving up.
const LOGRESP_LINE_BUDGET: usize = 10;

struct Halves {
    read: BufReader<OwnedReadHalf>,
    write: OwnedWriteHalf,
}

/// A stateful connection to APRS-IS. `open` only records configuration;
/// `connect` performs the network handshake.
pub struct Transport {
    callsign: String,
    passcode: u16,
    host: String,
    port: u16,
    filter: Option<String>,
    app_name: String,
    app_version: String,
    halves: Mutex<Option<Halves>>,
}

impl Transport {
    /// Construct a transport; does not connect. `passcode` of `-1` means
    /// "compute it from the callsign".
    pub fn open(
        callsign: impl Into<String>,
        passcode: i32,
        host: impl Into<String>,
        port: u16,
        filter: Option<String>,
    ) -> Self {
        let callsign = callsign.into();
        let passcode = if passcode < 0 {
            compute_passcode(&callsign)
        } else {
            (passcode as u16) & 0x7fff
        };
        Self {
            callsign,
            passcode,
            host: host.into(),
            port,
            filter,
            app_name: "aprs-bot".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            halves: Mutex::new(None),
        }
    }

    pub fn connected(&self) -> bool {
        self.halves.try_lock().map(|h| h.is_some()).unwrap_or(true)
    }

    /// Connect, send the login line, and wait for `# logresp`. Returns an
    /// error (without retrying) if any step fails — reconnect policy
    /// belongs to the supervisor.
    pub async fn connect(&self) -> DynResult<()> {
        let stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| CoreError::Io(format!("{}:{}", self.host, self.port), e.to_string()))?;
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        let login = match &self.filter {
            Some(filter) => format!(
                "user {} pass {} vers {} {} filter {}\r\n",
                self.callsign, self.passcode, self.app_name, self.app_version, filter
            ),
            None => format!(
                "user {} pass {} vers {} {}\r\n",
                self.callsign, self.passcode, self.app_name, self.app_version
            ),
        };
        write_half
            .write_all(login.as_bytes())
            .await
            .map_err(|e| CoreError::Io(format!("{}:{}", self.host, self.port), e.to_string()))?;

        let mut verified = false;
        let mut got_logresp = false;
        let mut line = String::new();
        for _ in 0..LOGRESP_LINE_BUDGET {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) => break,
                Ok(_) => {
                    if line.starts_with("# logresp") {
                        verified = !line.contains("unverified");
                        got_logresp = true;
                        break;
                    }
                }
                Err(e) => {
                    return Err(Box::new(CoreError::Io(
                        format!("{}:{}", self.host, self.port),
                        e.to_string(),
                    )));
                }
            }
        }

        if !got_logresp {
            return Err(Box::new(CoreError::Io(
                format!("{}:{}", self.host, self.port),
                "no logresp received".to_string(),
            )));
        }

        info!(
            "connected to {}:{} as {} ({})",
            self.host,
            self.port,
            self.callsign,
            if verified { "verified" } else { "unverified" }
        );

        *self.halves.lock().await = Some(Halves {
            read: reader,
            write: write_half,
        });
        Ok(())
    }

    /// Blocking read loop: parse each inbound line and hand recognized
    /// message frames to `on_frame`. Returns once the socket closes or a
    /// read error occurs; parse failures are logged and skipped.
    pub async fn consume<F, Fut>(&self, mut on_frame: F) -> DynResult<()>
    where
        F: FnMut(aprs_core::InboundFrame) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut line = String::new();
        loop {
            let read_result = {
                let mut guard = self.halves.lock().await;
                let halves = match guard.as_mut() {
                    Some(h) => h,
                    None => return Err(Box::new(CoreError::Io("transport".to_string(), "not connected".to_string()))),
                };
                line.clear();
                halves.read.read_line(&mut line).await
            };

            match read_result {
                Ok(0) => {
                    *self.halves.lock().await = None;
                    return Err(Box::new(CoreError::Io(
                        self.host.clone(),
                        "connection closed by peer".to_string(),
                    )));
                }
                Ok(_) => match parse_inbound_line(&line) {
                    Some(frame) => on_frame(frame).await,
                    None => debug!("ignoring unrecognized line: {}", line.trim_end()),
                },
                Err(e) => {
                    *self.halves.lock().await = None;
                    return Err(Box::new(CoreError::Io(self.host.clone(), e.to_string())));
                }
            }
        }
    }

    /// Send one raw line. Appends the protocol's CRLF. A no-op (with a
    /// warning) on a closed transport.
    pub async fn send(&self, line: &str) {
        let mut guard = self.halves.lock().await;
        let Some(halves) = guard.as_mut() else {
            warn!("dropping outbound line, transport not connected: {}", line);
            return;
        };
        let mut out = line.to_string();
        out.push_str("\r\n");
        if let Err(e) = halves.write.write_all(out.as_bytes()).await {
            warn!("write failed, marking transport disconnected: {}", e);
            *guard = None;
        }
    }

    /// Idempotent shutdown.
    pub async fn close(&self) {
        if let Some(mut halves) = self.halves.lock().await.take() {
            let _ = halves.write.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passcode_strips_ssid_and_is_masked() {
        assert_eq!(compute_passcode("N0CALL"), compute_passcode("N0CALL-9"));
        assert!(compute_passcode("N0CALL") <= 0x7fff);
    }

    #[test]
    fn passcode_is_case_insensitive() {
        assert_eq!(compute_passcode("n0call"), compute_passcode("N0CALL"));
    }

    #[tokio::test]
    async fn fresh_transport_is_not_connected() {
        let transport = Transport::open("N0CALL", -1, "localhost", 14580, None);
        assert!(!transport.connected());
    }

    #[tokio::test]
    async fn send_on_closed_transport_is_a_silent_no_op() {
        let transport = Transport::open("N0CALL", -1, "localhost", 14580, None);
        transport.send("TEST>APRS:hello").await;
    }

    #[tokio::test]
    async fn close_on_never_connected_transport_is_idempotent() {
        let transport = Transport::open("N0CALL", -1, "localhost", 14580, None);
        transport.close().await;
        transport.close().await;
    }
}
