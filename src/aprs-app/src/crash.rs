// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Crash notification. A panic hook can't await an async `Notifier`
//! without blocking the runtime it panicked on, so the work is split: the
//! panic hook synchronously gzips a crash dump to `nohup_filename` (no
//! async needed for that), and the supervisor calls [`notify_crash`] from
//! normal async context once it observes the panicked task, reading that
//! file back and handing it to the host's `Notifier`.

use std::io::Write;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::warn;

use aprs_dispatch::Notifier;

/// Install a panic hook that gzip-compresses the panic message and
/// location to `nohup_path`, then calls through to whatever hook was
/// previously installed.
pub fn install_panic_hook(nohup_path: PathBuf) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Err(e) = write_crash_dump(&nohup_path, &format_panic(info)) {
            eprintln!("failed to write crash dump to {}: {}", nohup_path.display(), e);
        }
        previous(info);
    }));
}

fn format_panic(info: &PanicHookInfo<'_>) -> String {
    match info.location() {
        Some(loc) => format!("panic at {}:{}: {}", loc.file(), loc.line(), info),
        None => format!("panic: {info}"),
    }
}

fn write_crash_dump(path: &Path, message: &str) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(message.as_bytes())?;
    encoder.finish()?;
    Ok(())
}

/// Send whatever crash dump `install_panic_hook` left behind via the
/// host's `Notifier`. A no-op if no dump file is present. Never panics.
/// Removes the dump file once it has been delivered, so a run that starts
/// clean never re-sends a crash from a previous process.
pub async fn notify_crash<N: Notifier>(notifier: &N, nohup_path: &Path, apprise_config_file: Option<&Path>, header: &str) {
    if !nohup_path.exists() {
        return;
    }
    let delivered = notifier
        .notify(header, "see attached crash log", Some(nohup_path), apprise_config_file)
        .await;
    if !delivered {
        warn!("crash notifier failed to deliver report from {}", nohup_path.display());
        return;
    }
    if let Err(e) = std::fs::remove_file(nohup_path) {
        warn!("failed to remove delivered crash dump {}: {}", nohup_path.display(), e);
    }
}
