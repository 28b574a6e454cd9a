// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Options that shape logging and configuration loading.
//!
//! ```text
//! --config FILE     ← Additional config files (can repeat)
//! --log-level N     ← Console verbosity (0-6)
//! --file-log-level  ← File verbosity (falls back to --log-level)
//! --log-file FILE   ← Enables file logging
//!
//! Precedence: CLI flags > GOCL_* env > --config > gocl.toml > defaults
//! ```

use std::path::PathBuf;

use clap::Args;

use crate::config::loader::ConfigLoader;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to an additional TOML configuration file.
    /// Can be specified multiple times.
    #[arg(long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6))]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6))]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOptions {
    /// Adds the `--config` files to `loader`.
    #[must_use]
    pub fn add_config_files(&self, loader: ConfigLoader) -> ConfigLoader {
        self.configs
            .iter()
            .fold(loader, |loader, path| loader.add_toml_file(path))
    }

    /// Applies the flags as `[global]` overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override key is rejected.
    pub fn apply_overrides(&self, loader: ConfigLoader) -> Result<ConfigLoader, ConfigError> {
        loader
            .set_opt("global.output_log_level", self.log_level.map(i64::from))?
            .set_opt(
                "global.file_log_level",
                self.file_log_level.or(self.log_level).map(i64::from),
            )?
            .set_opt(
                "global.log_file",
                self.log_file.as_ref().map(|p| p.display().to_string()),
            )
    }
}
