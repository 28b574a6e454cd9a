// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! Config: GlobalConfig [global], FetchConfig [fetch], ToolchainConfig [toolchain]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::logging::LogLevel;
use crate::pipeline::CloneLayout;

/// Global options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Log file; no file logging when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Repository fetching.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Probe the repository URL over HTTP before cloning.
    pub verify: bool,
    /// Probe timeout in seconds.
    pub timeout_secs: u64,
    pub layout: CloneLayout,
    /// git executable.
    pub git: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            verify: true,
            timeout_secs: 10,
            layout: CloneLayout::Isolated,
            git: PathBuf::from("git"),
        }
    }
}

impl FetchConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Go toolchain.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    /// go executable.
    pub go: PathBuf,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            go: PathBuf::from("go"),
        }
    }
}
