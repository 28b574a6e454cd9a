// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Go toolchain operations.
//!
//! ```text
//! Toolchain (trait)
//!   tidy(dir)              go mod tidy
//!   init(dir, module)      go mod init <module>
//!   build(dir, output)     go build -o <output>
//!   install(dir)           go install
//!
//! GoToolchain --> ProcessBuilder, stdout/stderr inherited
//! ```
//!
//! Every call streams the tool's own output straight to the terminal so
//! compiler diagnostics stay visible.

use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tracing::info;

use crate::core::process::builder::ProcessBuilder;
use crate::error::ProcessError;

/// Build toolchain capability used by the pipeline.
pub trait Toolchain: Send + Sync {
    /// Resolves and records dependencies in `dir`.
    fn tidy<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<(), ProcessError>>;

    /// Creates a module manifest for `module_path` in `dir`.
    fn init<'a>(
        &'a self,
        dir: &'a Path,
        module_path: &'a str,
    ) -> BoxFuture<'a, Result<(), ProcessError>>;

    /// Compiles the package in `dir` to the absolute path `output`.
    fn build<'a>(&'a self, dir: &'a Path, output: &'a Path)
    -> BoxFuture<'a, Result<(), ProcessError>>;

    /// Installs the package in `dir` to the toolchain's default bin directory.
    fn install<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<(), ProcessError>>;
}

/// The `go` command.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    go: PathBuf,
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::new("go")
    }
}

impl GoToolchain {
    #[must_use]
    pub fn new(go: impl Into<PathBuf>) -> Self {
        Self { go: go.into() }
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.go
    }

    fn command(&self, dir: &Path, name: &str) -> ProcessBuilder {
        ProcessBuilder::new(&self.go)
            .cwd(dir)
            .inherit_stdio()
            .name(name)
    }
}

impl Toolchain for GoToolchain {
    fn tidy<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<(), ProcessError>> {
        Box::pin(async move {
            info!(dir = %dir.display(), "go mod tidy");
            self.command(dir, "go mod tidy")
                .args(["mod", "tidy"])
                .run()
                .await
                .map(drop)
        })
    }

    fn init<'a>(
        &'a self,
        dir: &'a Path,
        module_path: &'a str,
    ) -> BoxFuture<'a, Result<(), ProcessError>> {
        Box::pin(async move {
            info!(dir = %dir.display(), module = module_path, "go mod init");
            self.command(dir, "go mod init")
                .args(["mod", "init", module_path])
                .run()
                .await
                .map(drop)
        })
    }

    fn build<'a>(
        &'a self,
        dir: &'a Path,
        output: &'a Path,
    ) -> BoxFuture<'a, Result<(), ProcessError>> {
        Box::pin(async move {
            info!(dir = %dir.display(), output = %output.display(), "go build");
            self.command(dir, "go build")
                .args(["build", "-o"])
                .arg(output)
                .run()
                .await
                .map(drop)
        })
    }

    fn install<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, Result<(), ProcessError>> {
        Box::pin(async move {
            info!(dir = %dir.display(), "go install");
            self.command(dir, "go install")
                .arg("install")
                .run()
                .await
                .map(drop)
        })
    }
}
