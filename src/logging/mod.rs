// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Logging through the `tracing` ecosystem.
//!
//! ```text
//! init_logging(&LogConfig)
//!        |
//!        v
//!    registry
//!    |       |
//!    v       v
//! Console   File (optional)
//! stderr    non_blocking, no ANSI
//!        |
//!        v
//!    LogGuard (flush on drop)
//!
//! LogLevel:  0=OFF  1=ERROR  2=WARN  3=INFO
//!            4=DEBUG  5=TRACE  6=DUMP(+http stack)
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use bon::Builder;
use serde::{Deserialize, Deserializer};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{ConfigError, Result};

/// Crates whose output is muted below [`LogLevel::DUMP`].
const NOISY_TARGETS: &[&str] = &["hyper_util", "reqwest", "rustls"];

/// Log level (0-6).
///
/// - 0: Silent
/// - 1: Error
/// - 2: Warn
/// - 3: Info (default)
/// - 4: Debug
/// - 5: Trace, including every line of child process output
/// - 6: Dump, also unmutes the HTTP stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LogLevel(u8);

impl Default for LogLevel {
    fn default() -> Self {
        Self::INFO
    }
}

impl LogLevel {
    pub const SILENT: Self = Self(0);
    pub const ERROR: Self = Self(1);
    pub const WARN: Self = Self(2);
    pub const INFO: Self = Self(3);
    pub const DEBUG: Self = Self(4);
    pub const TRACE: Self = Self(5);
    pub const DUMP: Self = Self(6);

    /// Creates a level from 0-6.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the level is greater than 6.
    pub fn new(level: u8) -> std::result::Result<Self, ConfigError> {
        if level <= Self::DUMP.0 {
            Ok(Self(level))
        } else {
            Err(ConfigError::InvalidValue {
                section: "global".to_string(),
                key: "log_level".to_string(),
                message: format!("log level must be 0-6, got {level}"),
            })
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn level_name(self) -> &'static str {
        match self.0 {
            0 => "off",
            1 => "error",
            2 => "warn",
            3 => "info",
            4 => "debug",
            _ => "trace",
        }
    }

    /// `EnvFilter` directives for this level.
    #[must_use]
    pub fn filter_directives(self) -> String {
        let base = self.level_name();
        if self >= Self::DUMP || self <= Self::WARN {
            return base.to_string();
        }
        NOISY_TARGETS
            .iter()
            .fold(base.to_string(), |acc, target| format!("{acc},{target}=warn"))
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = ConfigError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Logging system configuration.
#[derive(Debug, Clone, Builder)]
pub struct LogConfig {
    #[builder(setters(name = with_console_level), default = LogLevel::INFO)]
    console_level: LogLevel,
    #[builder(setters(name = with_file_level), default = LogLevel::TRACE)]
    file_level: LogLevel,
    #[builder(setters(name = with_log_file), into)]
    log_file: Option<PathBuf>,
    #[builder(setters(name = with_show_target), default = false)]
    show_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LogConfig {
    #[must_use]
    pub const fn console_level(&self) -> LogLevel {
        self.console_level
    }

    #[must_use]
    pub const fn file_level(&self) -> LogLevel {
        self.file_level
    }

    #[must_use]
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    #[must_use]
    pub const fn show_target(&self) -> bool {
        self.show_target
    }
}

/// Keeps the file writer alive; pending lines are flushed on drop.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// Console output goes to stderr so the toolchain's own output on stdout
/// stays clean.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or a subscriber is
/// already installed.
///
/// # Example
///
/// ```no_run
/// use gocl_rs::logging::{LogConfig, LogLevel, init_logging};
///
/// let config = LogConfig::builder()
///     .with_console_level(LogLevel::INFO)
///     .with_log_file("gocl.log")
///     .build();
///
/// let _guard = init_logging(&config)?;
/// tracing::info!("logging ready");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.show_target())
        .with_ansi(true)
        .without_time()
        .with_filter(EnvFilter::new(config.console_level().filter_directives()));

    let (file_layer, file_guard) = match config.log_file() {
        Some(log_path) => {
            if let Some(parent) = log_path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create log directory {}", parent.display())
                })?;
            }
            let file = std::fs::File::create(log_path)
                .with_context(|| format!("failed to create log file {}", log_path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);

            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_filter(EnvFilter::new(config.file_level().filter_directives()));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}
