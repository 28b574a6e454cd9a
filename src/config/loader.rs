// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file_optional("gocl.toml")
//!   .add_toml_file(--config)
//!   .with_env_prefix("GOCL")
//!   .set(cli overrides)
//!        |
//!        v
//!    build() --> Config (validated)
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Environment, File, FileFormat};

use super::Config;
use crate::error::ConfigError;

/// Separator between nested keys in environment variable names.
pub const ENV_SEPARATOR: &str = "__";

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    env_source: Option<HashMap<String, String>>,
    files: Vec<PathBuf>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            env_source: None,
            files: Vec::new(),
        }
    }

    /// Adds a TOML file that must exist.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self.files.push(p.to_path_buf());
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        if p.exists() {
            self.files.push(p.to_path_buf());
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.files.push(PathBuf::from("<string>"));
        self
    }

    /// Reads `<PREFIX>_<SECTION>__<KEY>` variables, e.g. `GOCL_FETCH__TIMEOUT_SECS`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Uses `vars` instead of the process environment.
    #[must_use]
    pub fn with_env_source(mut self, vars: HashMap<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key path is invalid.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self, ConfigError> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| ConfigError::InvalidValue {
                section: key.split('.').next().unwrap_or(key).to_string(),
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(self)
    }

    /// Sets an override only when `value` is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the key path is invalid.
    pub fn set_opt<T: Into<config::Value>>(
        self,
        key: &str,
        value: Option<T>,
    ) -> Result<Self, ConfigError> {
        match value {
            Some(value) => self.set(key, value),
            None => Ok(self),
        }
    }

    /// Merges every source and validates the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` when a required file is missing, a
    /// file is not valid TOML or a value has the wrong type, and
    /// `ConfigError::InvalidValue` when validation fails.
    pub fn build(self) -> Result<Config, ConfigError> {
        let sources = self.describe_sources();
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(self.env_source),
            ),
            None => self.builder,
        };

        let parse_error = |e: config::ConfigError| ConfigError::ParseError {
            path: sources.clone(),
            message: e.to_string(),
        };
        let config: Config = builder
            .build()
            .map_err(parse_error)?
            .try_deserialize()
            .map_err(parse_error)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.files
    }

    fn describe_sources(&self) -> String {
        if self.files.is_empty() {
            return "<defaults>".to_string();
        }
        self.files
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
