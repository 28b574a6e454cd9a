// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process builder with configuration options.
//!
//! ```text
//! ProcessBuilder
//!  • new/which/find
//!  • args/cwd/env/flag/name
//!  • capture_stderr, inherit_stdio
//!
//! ProcessFlags: ALLOW_FAILURE
//! StreamFlags: BIT_BUCKET (default), KEEP_IN_STRING, INHERIT
//! ```

use bitflags::bitflags;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};

use crate::error::ProcessError;

/// Static cache for executable paths resolved via `which`.
static EXECUTABLE_CACHE: OnceLock<RwLock<BTreeMap<String, PathBuf>>> = OnceLock::new();

/// Get the executable cache, initializing if needed.
fn exe_cache() -> &'static RwLock<BTreeMap<String, PathBuf>> {
    EXECUTABLE_CACHE.get_or_init(|| RwLock::new(BTreeMap::new()))
}

bitflags! {
    /// Flags controlling process execution behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProcessFlags: u32 {
        /// Don't fail if the process exits with a non-zero status
        const ALLOW_FAILURE = 0x01;
    }
}

bitflags! {
    /// Flags controlling stream handling for stdout/stderr.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StreamFlags: u32 {
        /// Discard output (send to /dev/null)
        const BIT_BUCKET = 0x01;
        /// Keep output in a string for later retrieval
        const KEEP_IN_STRING = 0x02;
        /// Inherit from parent process
        const INHERIT = 0x04;
    }
}

impl Default for StreamFlags {
    fn default() -> Self {
        Self::BIT_BUCKET
    }
}

/// Output from a completed process.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

impl ProcessOutput {
    pub(super) const fn new(exit_code: i32, stdout: String, stderr: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
        }
    }

    /// Returns the process exit code (0 = success, -1 = killed by signal).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Returns captured stdout (if `KEEP_IN_STRING` was set).
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Returns captured stderr (if `KEEP_IN_STRING` was set).
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Returns true if the process exited successfully (code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Builder for configuring and running a process.
#[derive(Debug)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    /// Extra variables layered over the inherited environment
    env: Vec<(String, String)>,
    flags: ProcessFlags,
    stdout: StreamFlags,
    stderr: StreamFlags,
    /// Display name for logging
    name: Option<String>,
}

impl ProcessBuilder {
    /// Creates a new `ProcessBuilder` for the given program.
    ///
    /// The program can be an absolute path, relative path, or just the executable name.
    /// If just a name is given, it will be resolved via PATH when `run()` is called.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            flags: ProcessFlags::empty(),
            stdout: StreamFlags::default(),
            stderr: StreamFlags::default(),
            name: None,
        }
    }

    /// Creates a `ProcessBuilder` after resolving the program via PATH.
    ///
    /// Results are cached for subsequent lookups of the same program.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError::ExecutableNotFound` if the executable is not found in PATH.
    pub fn which(program: &str) -> Result<Self, ProcessError> {
        Self::find(program)
            .map(Self::new)
            .ok_or_else(|| ProcessError::ExecutableNotFound {
                name: program.to_string(),
            })
    }

    /// Finds the full path to an executable in PATH.
    ///
    /// Absolute and relative paths are checked directly. Results are cached.
    #[must_use]
    pub fn find(program: &str) -> Option<PathBuf> {
        {
            let cache = exe_cache()
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(path) = cache.get(program) {
                return Some(path.clone());
            }
        }

        which::which(program).map_or(None, |path| {
            {
                let mut cache = exe_cache()
                    .write()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                cache.insert(program.to_string(), path.clone());
            }
            Some(path)
        })
    }

    /// Adds an argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Adds multiple arguments to the command.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string_lossy().into_owned());
        }
        self
    }

    /// Sets the working directory for the process.
    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets an environment variable on top of the inherited environment.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Adds a process flag.
    #[must_use]
    pub fn flag(mut self, flag: ProcessFlags) -> Self {
        self.flags |= flag;
        self
    }

    /// Configures stdout handling.
    #[must_use]
    pub const fn stdout_flags(mut self, flags: StreamFlags) -> Self {
        self.stdout = flags;
        self
    }

    /// Configures stderr handling.
    #[must_use]
    pub const fn stderr_flags(mut self, flags: StreamFlags) -> Self {
        self.stderr = flags;
        self
    }

    /// Convenience: capture stderr to string.
    #[must_use]
    pub const fn capture_stderr(self) -> Self {
        self.stderr_flags(StreamFlags::KEEP_IN_STRING)
    }

    /// Convenience: inherit stdout/stderr from parent.
    #[must_use]
    pub const fn inherit_stdio(self) -> Self {
        self.stdout_flags(StreamFlags::INHERIT)
            .stderr_flags(StreamFlags::INHERIT)
    }

    /// Sets a display name for logging.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns a reference to the program path.
    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    pub(super) fn args_slice(&self) -> &[String] {
        &self.args
    }

    pub(super) const fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    pub(super) fn env_vars(&self) -> &[(String, String)] {
        &self.env
    }

    pub(super) const fn process_flags(&self) -> ProcessFlags {
        self.flags
    }

    pub(super) const fn stdout_stream(&self) -> StreamFlags {
        self.stdout
    }

    pub(super) const fn stderr_stream(&self) -> StreamFlags {
        self.stderr
    }

    pub(super) fn name_override(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
