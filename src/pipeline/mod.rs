// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fetch, resolve and build one repository reference.
//!
//! ```text
//! RepositoryReference
//!        |
//!        v
//!   [verify] --(ReachabilityProbe)--> RepositoryUnreachable
//!        |
//!   WorkingContext::capture
//!        |
//!   [clone] --(Fetcher)------------> CloneFailed
//!        |
//!   [resolve] --(PathProbe)--------> CustomPathNotFound / DirectoryChangeFailed
//!        |
//!   [bootstrap] --(Toolchain)------> BootstrapFailed
//!        |
//!   [build | install] -------------> BuildFailed / InstallFailed
//!        |
//!   restore cwd, remove clone -----> RestoreFailed / CleanupFailed
//! ```
//!
//! Restore and cleanup run on every path once the working context has been
//! captured. When an earlier step already failed their errors are logged and
//! the first error is returned.

mod bootstrap;
mod output;
mod reference;
mod resolve;
mod workspace;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

pub use bootstrap::{BootstrapOutcome, GO_MOD, GO_SUM, bootstrap};
pub use output::OutputSpec;
pub use reference::{RepositoryReference, normalize};
pub use resolve::{BuildTarget, CandidateRule, PathProbe, StdPathProbe, resolve_target};
pub use workspace::{CloneLayout, DisposableClone, WorkingContext};

use crate::error::{GitError, PipelineError, ResolveError};
use crate::git::Fetcher;
use crate::net::{ReachabilityProbe, verify_reachable};
use crate::toolchain::Toolchain;

/// Per-run inputs beyond the reference itself.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Package directory relative to the clone root.
    pub custom_path: Option<PathBuf>,
    pub output: OutputSpec,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub url: String,
    /// Build directory relative to the clone root.
    pub target: PathBuf,
    pub rule: CandidateRule,
    pub bootstrap: BootstrapOutcome,
    /// Where the artifact was written, `None` after `go install`.
    pub artifact: Option<PathBuf>,
}

/// The fetch-resolve-build pipeline and its collaborators.
#[derive(Clone)]
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    toolchain: Arc<dyn Toolchain>,
    probe: Option<Arc<dyn ReachabilityProbe>>,
    paths: Arc<dyn PathProbe>,
    layout: CloneLayout,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("verify", &self.probe.is_some())
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Pipeline without a reachability check, using the real filesystem and
    /// the isolated clone layout.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>, toolchain: Arc<dyn Toolchain>) -> Self {
        Self {
            fetcher,
            toolchain,
            probe: None,
            paths: Arc::new(StdPathProbe),
            layout: CloneLayout::default(),
        }
    }

    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn ReachabilityProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    #[must_use]
    pub fn with_path_probe(mut self, paths: Arc<dyn PathProbe>) -> Self {
        self.paths = paths;
        self
    }

    #[must_use]
    pub const fn with_layout(mut self, layout: CloneLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub const fn layout(&self) -> CloneLayout {
        self.layout
    }

    /// Runs every step for `reference`.
    ///
    /// # Errors
    ///
    /// Returns the first failing step as a `PipelineError`. The working
    /// directory is restored and the clone removed on every path.
    pub async fn run(
        &self,
        reference: &RepositoryReference,
        options: &RunOptions,
    ) -> Result<RunReport, PipelineError> {
        let url = reference.url();
        if !reference.is_well_formed() {
            return Err(PipelineError::InvalidReference {
                url: url.to_string(),
            });
        }
        info!(url, name = reference.short_name(), "processing repository");

        if let Some(probe) = &self.probe {
            verify_reachable(probe.as_ref(), url)
                .await
                .map_err(|source| PipelineError::RepositoryUnreachable {
                    url: url.to_string(),
                    source,
                })?;
            debug!(url, step = "verify", "repository reachable");
        }

        let mut context =
            WorkingContext::capture().map_err(|source| PipelineError::WorkingDirUnavailable {
                url: url.to_string(),
                source,
            })?;
        let original = context.original().to_path_buf();

        let mut clone = DisposableClone::allocate(self.layout, &original, reference.short_name())
            .map_err(|e| PipelineError::CloneFailed {
                url: url.to_string(),
                source: GitError::CloneFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                },
            })?;
        let clone_root = clone.path().to_path_buf();

        let primary = self
            .fetch_and_build(reference, options, &mut context, &mut clone)
            .await;

        let restored = context
            .restore()
            .map_err(|source| PipelineError::RestoreFailed {
                url: url.to_string(),
                path: original.clone(),
                source,
            });
        let cleaned = clone
            .remove()
            .map_err(|source| PipelineError::CleanupFailed {
                url: url.to_string(),
                path: clone_root.clone(),
                source,
            });

        match primary {
            Ok(report) => {
                restored?;
                cleaned?;
                info!(url, target = %report.target.display(), "done");
                Ok(report)
            }
            Err(err) => {
                for secondary in [restored.err(), cleaned.err()].into_iter().flatten() {
                    warn!(url, step = %secondary.step(), error = %secondary, "cleanup after failure");
                }
                Err(err)
            }
        }
    }

    async fn fetch_and_build(
        &self,
        reference: &RepositoryReference,
        options: &RunOptions,
        context: &mut WorkingContext,
        clone: &mut DisposableClone,
    ) -> Result<RunReport, PipelineError> {
        let url = reference.url();
        let short_name = reference.short_name();

        info!(url, path = %clone.path().display(), step = "clone", "cloning repository");
        self.fetcher
            .clone_shallow(url, clone.path())
            .await
            .map_err(|source| PipelineError::CloneFailed {
                url: url.to_string(),
                source,
            })?;
        clone.arm();

        let target = resolve_target(
            clone.path(),
            short_name,
            options.custom_path.as_deref(),
            self.paths.as_ref(),
        )
        .map_err(|source| resolve_failed(url, source))?;
        info!(url, rule = target.rule().as_str(), path = %target.path().display(), step = "resolve", "build target resolved");

        context
            .enter(target.path())
            .map_err(|source| PipelineError::DirectoryChangeFailed {
                url: url.to_string(),
                path: target.path().to_path_buf(),
                source,
            })?;

        let outcome = bootstrap(self.toolchain.as_ref(), target.path(), reference.module_path())
            .await
            .map_err(|source| PipelineError::BootstrapFailed {
                url: url.to_string(),
                source,
            })?;
        debug!(url, ?outcome, step = "bootstrap", "manifest ready");

        let artifact = options.output.artifact_path(context.original(), short_name);
        match &artifact {
            Some(path) => self.build_to(url, target.path(), path).await?,
            None => self
                .toolchain
                .install(target.path())
                .await
                .map_err(|source| PipelineError::InstallFailed {
                    url: url.to_string(),
                    source,
                })?,
        }

        let relative = target
            .path()
            .strip_prefix(clone.path())
            .map_or_else(|_| target.path().to_path_buf(), Path::to_path_buf);

        Ok(RunReport {
            url: url.to_string(),
            target: relative,
            rule: target.rule(),
            bootstrap: outcome,
            artifact,
        })
    }

    async fn build_to(&self, url: &str, dir: &Path, artifact: &Path) -> Result<(), PipelineError> {
        if let Some(parent) = artifact.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| PipelineError::OutputDirFailed {
                    url: url.to_string(),
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        info!(url, output = %artifact.display(), step = "build", "building");
        self.toolchain
            .build(dir, artifact)
            .await
            .map_err(|source| PipelineError::BuildFailed {
                url: url.to_string(),
                path: artifact.to_path_buf(),
                source,
            })
    }
}

fn resolve_failed(url: &str, source: ResolveError) -> PipelineError {
    let url = url.to_string();
    match source {
        ResolveError::CustomPathNotFound { .. } => PipelineError::CustomPathNotFound { url, source },
        ResolveError::CustomPathOutsideClone { .. } => {
            PipelineError::CustomPathRejected { url, source }
        }
    }
}

#[cfg(test)]
mod tests;
