// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. gocl.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. GOCL_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GOCL_FETCH__VERIFY=false         → fetch.verify = false
//! GOCL_FETCH__TIMEOUT_SECS=30      → fetch.timeout_secs = 30
//! GOCL_TOOLCHAIN__GO=/opt/go/bin/go → toolchain.go = "/opt/go/bin/go"
//! ```

pub mod loader;
pub mod types;


use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

use loader::ConfigLoader;
use types::{FetchConfig, GlobalConfig, ToolchainConfig};

/// Name of the optional configuration file read from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "gocl.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "GOCL";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub global: GlobalConfig,
    pub fetch: FetchConfig,
    pub toolchain: ToolchainConfig,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gocl_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("gocl.toml")
    ///     .with_env_prefix("GOCL")
    ///     .build()?;
    /// # Ok::<(), gocl_rs::error::ConfigError>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Loads configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed or invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::builder().add_toml_file(path).build()
    }

    /// Loads configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is malformed or invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::builder().add_toml_str(content).build()
    }

    /// Checks values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 {
            return Err(invalid("fetch", "timeout_secs", "must be greater than 0"));
        }
        if self.fetch.git.as_os_str().is_empty() {
            return Err(invalid("fetch", "git", "must not be empty"));
        }
        if self.toolchain.go.as_os_str().is_empty() {
            return Err(invalid("toolchain", "go", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(section: &str, key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}
