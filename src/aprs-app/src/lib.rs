// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Ambient application stack for the APRS-IS messaging bot: config
//! loading, logging initialization and crash notification.

pub mod config;
pub mod crash;
pub mod logging;

pub use config::{AppConfig, ConfigError, ConfigFile};
pub use crash::{install_panic_hook, notify_crash};
pub use logging::init_logging;
