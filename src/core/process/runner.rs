// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run()
//!   |
//!   v
//! build_command()
//! args, cwd, env, stdio
//!   |
//!   v
//! spawn() --> run_child()
//!   |
//!   v
//! validate exit_code
//! (skip if ALLOW_FAILURE)
//!   |
//!   v
//! ProcessOutput
//! { exit_code, stdout, stderr }
//! ```

use std::fmt::Write as _;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, error, trace};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};
use crate::error::ProcessError;

impl ProcessBuilder {
    /// Returns the display name for this process.
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string (for logging).
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns and runs the process, waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Spawning the child process fails.
    /// - The process exits non-zero and `ALLOW_FAILURE` is not set.
    /// - Waiting for the process fails.
    pub async fn run(self) -> Result<ProcessOutput, ProcessError> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();

        let mut child = command.spawn().map_err(|source| ProcessError::SpawnFailed {
            command: cmd_line.clone(),
            source,
        })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let output = self.run_child(&name, &mut child).await?;

        if !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE) && !output.success() {
            if !output.stderr().is_empty() {
                error!(process = %name, stderr = %output.stderr(), "process error output");
            }
            return Err(ProcessError::NonZeroExit {
                command: cmd_line,
                code: output.exit_code(),
            });
        }

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());

        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        for (key, value) in self.env_vars() {
            command.env(key, value);
        }

        command.stdin(Stdio::null());
        command.stdout(Self::stdio_from_flags(self.stdout_stream()));
        command.stderr(Self::stdio_from_flags(self.stderr_stream()));

        command.kill_on_drop(true);

        command
    }

    /// Converts `StreamFlags` to Stdio configuration.
    fn stdio_from_flags(flags: StreamFlags) -> Stdio {
        if flags.contains(StreamFlags::INHERIT) {
            Stdio::inherit()
        } else if flags.contains(StreamFlags::BIT_BUCKET) {
            Stdio::null()
        } else {
            Stdio::piped()
        }
    }
}
