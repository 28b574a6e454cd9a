// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Source fetching through the git CLI.
//!
//! ```text
//! Fetcher (trait)
//!    |
//!    v
//! ShellFetcher --> git clone --quiet --depth 1 <url> <dest>
//!                  stdout discarded, stderr kept for the error message
//!                  GCM_INTERACTIVE=never, GIT_TERMINAL_PROMPT=0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::future::BoxFuture;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::core::process::builder::{ProcessBuilder, ProcessFlags};
use crate::error::GitError;

/// Capability to produce a shallow working copy of a remote repository.
pub trait Fetcher: Send + Sync {
    /// Clones `url` at depth 1 into `dest`, which must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the clone could not be produced.
    fn clone_shallow<'a>(&'a self, url: &'a str, dest: &'a Path)
    -> BoxFuture<'a, Result<(), GitError>>;
}

/// Git CLI fetcher.
#[derive(Debug, Clone)]
pub struct ShellFetcher {
    git: PathBuf,
    progress: bool,
}

impl Default for ShellFetcher {
    fn default() -> Self {
        Self::new("git")
    }
}

impl ShellFetcher {
    #[must_use]
    pub fn new(git: impl Into<PathBuf>) -> Self {
        Self {
            git: git.into(),
            progress: true,
        }
    }

    /// Shows a spinner on stderr while the clone runs.
    #[must_use]
    pub const fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    fn spinner(&self, url: &str) -> Option<ProgressBar> {
        if !self.progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        }
        pb.set_message(format!("cloning {url}"));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

impl Fetcher for ShellFetcher {
    fn clone_shallow<'a>(
        &'a self,
        url: &'a str,
        dest: &'a Path,
    ) -> BoxFuture<'a, Result<(), GitError>> {
        Box::pin(async move {
            debug!(url, dest = %dest.display(), "git clone");
            let spinner = self.spinner(url);

            let result = ProcessBuilder::new(&self.git)
                .args(["clone", "--quiet", "-c", "advice.detachedHead=false"])
                .args(["--depth", "1"])
                .arg(url)
                .arg(dest)
                .env("GCM_INTERACTIVE", "never")
                .env("GIT_TERMINAL_PROMPT", "0")
                .capture_stderr()
                .flag(ProcessFlags::ALLOW_FAILURE)
                .name("git clone")
                .run()
                .await;

            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }

            let output = result.map_err(|e| GitError::CommandFailed {
                command: "git clone".to_string(),
                message: e.to_string(),
            })?;

            if output.success() {
                Ok(())
            } else {
                let message = output
                    .stderr()
                    .lines()
                    .rev()
                    .find(|line| !line.trim().is_empty())
                    .map_or_else(
                        || format!("git exited with code {}", output.exit_code()),
                        |line| line.trim().to_string(),
                    );
                Err(GitError::CloneFailed {
                    url: url.to_string(),
                    message,
                })
            }
        })
    }
}
