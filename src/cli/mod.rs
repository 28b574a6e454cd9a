// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command-line interface using clap derive.
//!
//! ```text
//! gocl [global options] [install options] [--version]
//!
//!   global:  --config FILE...  -l LEVEL  --file-log-level LEVEL  --log-file FILE
//!   install: -i URL|FILE  -c PATH  -o DIR  -n NAME  --no-verify  --in-place
//! ```

pub mod global;
pub mod install;


use clap::Parser;

use crate::cli::global::GlobalOptions;
use crate::cli::install::InstallArgs;

/// Usage examples printed when no input is given.
pub const USAGE: &str = "Usage:
 gocl -i github.com/example/tool
 gocl -i github.com/example/service -c cmd/service-client
 gocl -i urls.txt

urls.txt:
 github.com/example/tool
 github.com/example/other";

/// Clone a Go repository, build its program and clean up.
#[derive(Debug, Parser)]
#[command(
    name = "gocl",
    author,
    about = "Clone a Go repository, build its program and clean up",
    long_about = "gocl-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Fetches a repository with a shallow clone, finds the main\n\
                  package (custom path, v2/cmd/<name>, cmd/<name>, or the root),\n\
                  creates go.mod/go.sum when missing, then runs `go install` or\n\
                  `go build -o`. The clone is removed afterwards.",
    after_help = "CONFIG FILES:\n\n\
                  gocl reads `gocl.toml` from the current directory when present.\n\
                  Additional files can be given with --config; later files win.\n\
                  GOCL_<SECTION>__<KEY> environment variables override files, and\n\
                  command-line flags override everything.",
    disable_version_flag = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(flatten)]
    pub install: InstallArgs,

    /// Print the version of the tool and exit.
    #[arg(long)]
    pub version: bool,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or help was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}

/// The line printed by `--version`.
#[must_use]
pub fn version_line() -> String {
    format!("Current gocl version v{}", env!("CARGO_PKG_VERSION"))
}
