// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-run options.

use std::path::PathBuf;

use clap::Args;

use crate::config::loader::ConfigLoader;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Args)]
pub struct InstallArgs {
    /// URL or file containing URLs of the repository to install.
    #[arg(short = 'i', long = "input", value_name = "URL|FILE")]
    pub input: Option<String>,

    /// Custom path to use for installation (e.g., cmd/interactsh-client).
    #[arg(short = 'c', long = "custom-path", value_name = "PATH")]
    pub custom_path: Option<PathBuf>,

    /// Build into this directory with `go build -o` instead of `go install`.
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Artifact name inside --output (defaults to the repository name).
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Skip the HTTP reachability check before cloning.
    #[arg(long = "no-verify")]
    pub no_verify: bool,

    /// Clone into ./<name> instead of a temporary directory.
    #[arg(long = "in-place")]
    pub in_place: bool,
}

impl InstallArgs {
    /// Applies the flags as `[fetch]` overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override key is rejected.
    pub fn apply_overrides(&self, loader: ConfigLoader) -> Result<ConfigLoader, ConfigError> {
        loader
            .set_opt("fetch.verify", self.no_verify.then_some(false))?
            .set_opt("fetch.layout", self.in_place.then_some("in-place"))
    }
}
