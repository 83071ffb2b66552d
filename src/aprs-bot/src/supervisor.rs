// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Session Supervisor (C9): the eternal connect/run/teardown loop —
//! connect, run the scheduler and consumer until disconnect, flush the
//! counter, sleep, repeat. The scheduler never imports this module's
//! types — it only receives a bound `LineSender` and a
//! `watch::Receiver<bool>`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use aprs_app::AppConfig;
use aprs_core::{format_beacon, DedupCache, DynResult, OutboundCounter};
use aprs_demo_handlers::{DemoGenerator, DemoParser, DemoPostProcessor};
use aprs_dispatch::{Pipeline, PipelineConfig};
use aprs_scheduler::{BulletinTable, Scheduler};
use aprs_transport::Transport;

use crate::sender::TransportSender;

/// The demo-handler pipeline type the default binary runs. A deployment
/// wanting its own `Parser`/`Generator`/`PostProcessor` swaps these type
/// parameters for its own types and reuses [`run`] verbatim.
type BotPipeline = Pipeline<DemoParser, DemoGenerator, DemoPostProcessor, TransportSender>;

const APRS_LINE_BUDGET: usize = 67;

/// Run the supervisor loop until `shutdown` reports `true`. Returns once
/// shutdown has been observed and all session state has been torn down
/// and flushed.
pub async fn run(cfg: AppConfig, mut shutdown: watch::Receiver<bool>) -> DynResult<()> {
    let data_dir = PathBuf::from(&cfg.data_storage.aprs_data_directory);
    std::fs::create_dir_all(&data_dir)
        .map_err(|e| format!("cannot create data directory {}: {}", data_dir.display(), e))?;
    let counter_path = data_dir.join(&cfg.data_storage.aprs_message_counter_file_name);
    let counter = Arc::new(OutboundCounter::load(&counter_path));
    let cache = Arc::new(DedupCache::new(
        cfg.dupe_detection.msg_cache_max_entries,
        Duration::from_secs(cfg.dupe_detection.msg_cache_time_to_live),
    ));
    let bulletin_table = Arc::new(BulletinTable::new(cfg.bulletin_config.bulletins.clone()));

    while !*shutdown.borrow() {
        run_one_session(&cfg, &cache, &counter, &bulletin_table, &mut shutdown).await;

        counter.flush();

        if *shutdown.borrow() {
            break;
        }
        tokio::time::sleep(Duration::from_secs_f64(cfg.message_delay.packet_delay_message)).await;
    }

    counter.flush();
    Ok(())
}

async fn run_one_session(
    cfg: &AppConfig,
    cache: &Arc<DedupCache>,
    counter: &Arc<OutboundCounter>,
    bulletin_table: &Arc<BulletinTable>,
    shutdown: &mut watch::Receiver<bool>,
) {
    let filter = if cfg.network_config.aprsis_server_filter.is_empty() {
        None
    } else {
        Some(cfg.network_config.aprsis_server_filter.clone())
    };
    let transport = Arc::new(Transport::open(
        cfg.client_config.aprsis_callsign.clone(),
        cfg.network_config.aprsis_passcode,
        cfg.network_config.aprsis_server_name.clone(),
        cfg.network_config.aprsis_server_port,
        filter,
    ));

    if let Err(e) = transport.connect().await {
        warn!("could not connect to APRS-IS: {}", e);
        return;
    }

    let sender = Arc::new(TransportSender::new(transport.clone(), cfg.testing.aprsis_simulate_send));

    let pipeline: Arc<BotPipeline> = Arc::new(Pipeline::new(
        PipelineConfig {
            bot_callsign: cfg.client_config.aprsis_callsign.clone(),
            tocall: cfg.client_config.aprsis_tocall.clone(),
            default_error_message: cfg.client_config.aprs_input_parser_default_error_message.clone(),
            enumerate_segments: cfg.client_config.aprs_message_enumeration,
            segment_budget: APRS_LINE_BUDGET,
            ack_delay: Duration::from_secs_f64(cfg.message_delay.packet_delay_ack),
            inter_packet_delay: Duration::from_secs_f64(cfg.message_delay.packet_delay_message),
        },
        cache.clone(),
        counter.clone(),
        DemoParser,
        DemoGenerator,
        Some(DemoPostProcessor),
        sender.clone(),
    ));

    let scheduler = Scheduler::new(
        sender.clone(),
        cfg.client_config.aprsis_callsign.clone(),
        cfg.client_config.aprsis_tocall.clone(),
    );
    let (job_shutdown_tx, job_shutdown_rx) = watch::channel(false);
    let mut job_handles = Vec::new();

    if cfg.beacon_config.aprsis_broadcast_beacon {
        let beacon_line = format_beacon(
            &cfg.client_config.aprsis_callsign,
            &cfg.client_config.aprsis_tocall,
            &cfg.beacon_config.aprsis_latitude,
            cfg.beacon_config.aprsis_table,
            &cfg.beacon_config.aprsis_longitude,
            cfg.beacon_config.aprsis_symbol,
            &cfg.client_config.aprsis_callsign,
            &cfg.client_config.aprs_client_name,
            cfg.beacon_config.aprsis_beacon_altitude_ft,
        );
        let interval = Duration::from_secs(cfg.beacon_config.aprsis_beacon_interval_minutes * 60);
        job_handles.push(scheduler.spawn_beacon(beacon_line, interval, job_shutdown_rx.clone()));
    }

    if cfg.bulletin_config.aprsis_broadcast_bulletins {
        let interval = Duration::from_secs(cfg.bulletin_config.aprsis_bulletin_interval_minutes * 60);
        let inter_delay = Duration::from_secs_f64(cfg.message_delay.packet_delay_bulletin);
        job_handles.push(scheduler.spawn_bulletins(bulletin_table.clone(), interval, inter_delay, job_shutdown_rx.clone()));
    }

    info!("session connected as {}", cfg.client_config.aprsis_callsign);

    let consume_result = {
        let pipeline = pipeline.clone();
        tokio::select! {
            res = transport.consume(move |frame| {
                let pipeline = pipeline.clone();
                async move { pipeline.handle(frame).await; }
            }) => res,
            _ = shutdown.changed() => Ok(()),
        }
    };

    let _ = job_shutdown_tx.send(true);
    for handle in job_handles {
        let _ = handle.await;
    }
    transport.close().await;

    if let Err(e) = consume_result {
        warn!("session ended: {}", e);
    }
}
