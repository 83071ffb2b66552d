// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Periodic beacon and bulletin emission (C8). Jobs live only as long as
//! their connected session does. Each job is a single sequential task, so
//! only one instance of a job can ever run at a time: a job's body always
//! completes before its loop returns to the next `tick()`/shutdown race.

pub mod bulletins;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use aprs_core::format_bulletin;
use aprs_dispatch::LineSender;

pub use bulletins::{BulletinHandle, BulletinTable};

/// Spawns the beacon and bulletin jobs for one connected session. Holds
/// only what both jobs need to format their own lines; the session
/// supervisor owns the returned `JoinHandle`s and the `shutdown` sender.
pub struct Scheduler<S: LineSender> {
    sender: Arc<S>,
    from_callsign: String,
    tocall: String,
}

impl<S: LineSender + 'static> Scheduler<S> {
    pub fn new(sender: Arc<S>, from_callsign: impl Into<String>, tocall: impl Into<String>) -> Self {
        Self {
            sender,
            from_callsign: from_callsign.into(),
            tocall: tocall.into(),
        }
    }

    /// Emit `line` immediately, then every `interval` until `shutdown`
    /// signals true. `tokio::time::interval`'s first tick resolves
    /// immediately, so no separate priming send is needed.
    pub fn spawn_beacon(&self, line: String, interval: Duration, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        debug!("emitting beacon");
                        sender.send_line(&line).await;
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        })
    }

    /// Every `interval`, snapshot `table` and emit each bulletin in turn,
    /// waiting `inter_bulletin_delay` between entries. Unlike the beacon
    /// job, bulletins do not fire on startup — the first emission happens
    /// after the first full interval has elapsed.
    pub fn spawn_bulletins(
        &self,
        table: Arc<BulletinTable>,
        interval: Duration,
        inter_bulletin_delay: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let sender = self.sender.clone();
        let from_callsign = self.from_callsign.clone();
        let tocall = self.tocall.clone();
        tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let snapshot = table.snapshot();
                        debug!("emitting {} bulletin(s)", snapshot.len());
                        for (bln_id, text) in snapshot {
                            let line = format_bulletin(&from_callsign, &tocall, &bln_id, &text);
                            sender.send_line(&line).await;
                            time::sleep(inter_bulletin_delay).await;
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        })
    }
}
