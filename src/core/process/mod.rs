// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning.
//!
//! ```text
//! ProcessBuilder::new("go")
//!   .args() .cwd() .env() .capture_stderr() .inherit_stdio()
//!   .run()
//!       --> tokio::process::Command
//!           inherit, capture or discard stdout/stderr
//!       --> ProcessOutput { exit_code, stdout, stderr }
//! ```

pub mod builder;
mod io;
mod runner;
