// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            GoclError (16 bytes)
//!                    |
//!   +------+------+------+------+
//!   |      |      |      |      |
//!   v      v      v      v      v
//!  Cfg   Proc    Fs    Net  Pipeline
//!  Box   Box    Box    Box    Box
//!
//! PipelineError (one per reference, never fatal to the batch)
//!   InvalidReference       normalize
//!   RepositoryUnreachable  verify    <- NetworkError
//!   CloneFailed            clone     <- GitError
//!   CustomPathNotFound     resolve   <- ResolveError
//!   CustomPathRejected     resolve   <- ResolveError
//!   DirectoryChangeFailed  resolve
//!   BootstrapFailed        bootstrap <- ProcessError (tidy/init/retidy)
//!   BuildFailed            build     <- ProcessError
//!   InstallFailed          install   <- ProcessError
//!   RestoreFailed          restore
//!   CleanupFailed          cleanup
//! ```

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`GoclError`].
pub type GoclResult<T> = std::result::Result<T, GoclError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum two words wide.
#[derive(Debug, Error)]
pub enum GoclError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// Network setup error.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// A single repository reference failed.
    #[error("{0}")]
    Pipeline(#[from] Box<PipelineError>),
}

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for GoclError {
                fn from(err: $error) -> Self {
                    GoclError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    ProcessError => Process,
    FsError => Fs,
    NetworkError => Network,
    PipelineError => Pipeline,
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Clone operation failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP status other than 200/204.
    #[error("received status code {status} from {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Connection timeout.
    #[error("connection timeout after {timeout_secs}s: {url}")]
    Timeout { url: String, timeout_secs: u64 },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Failed to read process output or wait for it.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Resolution Errors ---

/// Build target resolution errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The caller-supplied sub-path does not exist under the clone root.
    #[error("custom path {} does not exist", path.display())]
    CustomPathNotFound { path: PathBuf },

    /// The caller-supplied sub-path is absolute or climbs out of the clone.
    #[error("custom path {} must stay inside the repository", path.display())]
    CustomPathOutsideClone { path: PathBuf },
}

// --- Pipeline Errors ---

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Normalize,
    Verify,
    Clone,
    Resolve,
    Bootstrap,
    Build,
    Install,
    Restore,
    Cleanup,
}

impl Step {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normalize => "normalize",
            Self::Verify => "verify",
            Self::Clone => "clone",
            Self::Resolve => "resolve",
            Self::Bootstrap => "bootstrap",
            Self::Build => "build",
            Self::Install => "install",
            Self::Restore => "restore",
            Self::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Manifest bootstrap sub-step that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    /// First `go mod tidy`.
    Tidy,
    /// `go mod init <module>`.
    Init,
    /// `go mod tidy` after a successful init.
    RetryTidy,
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tidy => "go mod tidy",
            Self::Init => "go mod init",
            Self::RetryTidy => "go mod tidy (after init)",
        })
    }
}

/// Manifest bootstrap failure.
#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct BootstrapError {
    pub step: BootstrapStep,
    #[source]
    pub source: ProcessError,
}

/// Failure of one repository reference.
///
/// Every variant carries the normalized URL so it prints as a single line.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{url}: not a valid repository reference")]
    InvalidReference { url: String },

    #[error("repository {url:?} is invalid or inaccessible: {source}")]
    RepositoryUnreachable {
        url: String,
        #[source]
        source: NetworkError,
    },

    #[error("{url}: failed to read current directory: {source}")]
    WorkingDirUnavailable {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{url}: error cloning repository: {source}")]
    CloneFailed {
        url: String,
        #[source]
        source: GitError,
    },

    #[error("{url}: {source}")]
    CustomPathNotFound {
        url: String,
        #[source]
        source: ResolveError,
    },

    #[error("{url}: {source}")]
    CustomPathRejected {
        url: String,
        #[source]
        source: ResolveError,
    },

    #[error("{url}: error changing directory to {}: {source}", path.display())]
    DirectoryChangeFailed {
        url: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{url}: {source}")]
    BootstrapFailed {
        url: String,
        #[source]
        source: BootstrapError,
    },

    #[error("{url}: failed to create output directory {}: {source}", path.display())]
    OutputDirFailed {
        url: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{url}: error running go build -o {}: {source}", path.display())]
    BuildFailed {
        url: String,
        path: PathBuf,
        #[source]
        source: ProcessError,
    },

    #[error("{url}: error running go install: {source}")]
    InstallFailed {
        url: String,
        #[source]
        source: ProcessError,
    },

    #[error("{url}: error returning to {}: {source}", path.display())]
    RestoreFailed {
        url: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{url}: error removing cloned repository {}: {source}", path.display())]
    CleanupFailed {
        url: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Returns the pipeline stage this failure belongs to.
    #[must_use]
    pub const fn step(&self) -> Step {
        match self {
            Self::InvalidReference { .. } => Step::Normalize,
            Self::RepositoryUnreachable { .. } => Step::Verify,
            Self::WorkingDirUnavailable { .. } | Self::CloneFailed { .. } => Step::Clone,
            Self::CustomPathNotFound { .. }
            | Self::CustomPathRejected { .. }
            | Self::DirectoryChangeFailed { .. } => Step::Resolve,
            Self::BootstrapFailed { .. } => Step::Bootstrap,
            Self::OutputDirFailed { .. } | Self::BuildFailed { .. } => Step::Build,
            Self::InstallFailed { .. } => Step::Install,
            Self::RestoreFailed { .. } => Step::Restore,
            Self::CleanupFailed { .. } => Step::Cleanup,
        }
    }

    /// Returns the normalized URL of the failing reference.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidReference { url }
            | Self::RepositoryUnreachable { url, .. }
            | Self::WorkingDirUnavailable { url, .. }
            | Self::CloneFailed { url, .. }
            | Self::CustomPathNotFound { url, .. }
            | Self::CustomPathRejected { url, .. }
            | Self::DirectoryChangeFailed { url, .. }
            | Self::BootstrapFailed { url, .. }
            | Self::OutputDirFailed { url, .. }
            | Self::BuildFailed { url, .. }
            | Self::InstallFailed { url, .. }
            | Self::RestoreFailed { url, .. }
            | Self::CleanupFailed { url, .. } => url,
        }
    }
}
