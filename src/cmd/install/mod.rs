// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Install command: drive the pipeline over one reference or a list file.
//!
//! ```text
//! --input ──> InputSource::detect
//!               Single(ref)      existing file? no
//!               ListFile(path)   existing file? yes --> read_reference_list
//!                     |
//!                     v
//!   build_pipeline(config)  git/go on PATH? --> ExecutableNotFound
//!                     |
//!                     v
//!   run_batch: for each ref, in order
//!       normalize --> Pipeline::run --> ok / error! and continue
//!                     |
//!                     v
//!               BatchSummary
//! ```

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::cli::install::InstallArgs;
use crate::config::Config;
use crate::core::process::builder::ProcessBuilder;
use crate::error::{FsError, GoclResult, PipelineError, ProcessError};
use crate::git::ShellFetcher;
use crate::net::HttpProbe;
use crate::pipeline::{OutputSpec, Pipeline, RunOptions, RunReport, normalize};
use crate::toolchain::GoToolchain;

/// Where references come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Single(String),
    ListFile(PathBuf),
}

impl InputSource {
    /// An input naming an existing file is a list; anything else is a reference.
    #[must_use]
    pub fn detect(input: &str) -> Self {
        let path = Path::new(input);
        if path.is_file() {
            Self::ListFile(path.to_path_buf())
        } else {
            Self::Single(input.trim().to_string())
        }
    }

    /// Expands the source into references, in order.
    ///
    /// # Errors
    ///
    /// Returns an `FsError` if the list file cannot be read.
    pub fn references(&self) -> Result<Vec<String>, FsError> {
        match self {
            Self::Single(reference) => Ok(vec![reference.clone()]),
            Self::ListFile(path) => read_reference_list(path),
        }
    }
}

/// One reference per line; blank lines and `#` comments are skipped.
#[must_use]
pub fn parse_reference_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Reads a reference list file.
///
/// # Errors
///
/// Returns `FsError::NotFound` or `FsError::IoError` if the file cannot be read.
pub fn read_reference_list(path: &Path) -> Result<Vec<String>, FsError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            FsError::NotFound(path.display().to_string())
        } else {
            FsError::IoError {
                path: path.display().to_string(),
                source,
            }
        }
    })?;
    Ok(parse_reference_list(&content))
}

/// Outcome of a batch.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: Vec<RunReport>,
    pub failed: Vec<PipelineError>,
}

impl BatchSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// `true` when no reference failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs every reference in order; a failure never stops the batch.
pub async fn run_batch(
    pipeline: &Pipeline,
    references: &[String],
    options: &RunOptions,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for raw in references {
        let reference = normalize(raw);
        match pipeline.run(&reference, options).await {
            Ok(report) => summary.succeeded.push(report),
            Err(e) => {
                error!(url = e.url(), step = %e.step(), "{e}");
                summary.failed.push(e);
            }
        }
    }
    info!(
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        "processed {} repositories",
        summary.total()
    );
    summary
}

fn locate(program: &Path) -> Result<PathBuf, ProcessError> {
    ProcessBuilder::which(&program.to_string_lossy()).map(|builder| builder.program().clone())
}

/// Wires the pipeline from configuration.
///
/// # Errors
///
/// Returns `ProcessError::ExecutableNotFound` if git or go is missing, or a
/// network error if the HTTP client cannot be built.
pub fn build_pipeline(config: &Config) -> GoclResult<Pipeline> {
    let git = locate(&config.fetch.git)?;
    let go = locate(&config.toolchain.go)?;

    let fetcher = ShellFetcher::new(git).with_progress(std::io::stderr().is_terminal());
    let mut pipeline = Pipeline::new(Arc::new(fetcher), Arc::new(GoToolchain::new(go)))
        .with_layout(config.fetch.layout);
    if config.fetch.verify {
        pipeline = pipeline.with_probe(Arc::new(HttpProbe::new(config.fetch.timeout())?));
    }
    Ok(pipeline)
}

/// Maps CLI arguments to per-run options.
#[must_use]
pub fn run_options(args: &InstallArgs) -> RunOptions {
    if args.name.is_some() && args.output.is_none() {
        warn!("--name has no effect without --output");
    }
    RunOptions {
        custom_path: args.custom_path.clone(),
        output: OutputSpec::from_parts(args.output.clone(), args.name.clone()),
    }
}

/// Main handler for the install command.
///
/// # Errors
///
/// Returns an error when the input list cannot be read or a required
/// executable is missing. Per-reference failures are in the summary.
pub async fn run_install_command(args: &InstallArgs, config: &Config) -> GoclResult<BatchSummary> {
    let Some(input) = args.input.as_deref() else {
        return Ok(BatchSummary::default());
    };

    let references = InputSource::detect(input).references()?;
    if references.is_empty() {
        warn!(input, "no repository references to process");
        return Ok(BatchSummary::default());
    }

    let pipeline = build_pipeline(config)?;
    let options = run_options(args);
    Ok(run_batch(&pipeline, &references, &options).await)
}

#[cfg(test)]
mod tests;
