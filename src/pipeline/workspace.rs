// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process working directory and disposable clone ownership.
//!
//! ```text
//! WorkingContext::capture()      cwd recorded
//!     enter(target)              cwd = target
//!     restore()  / Drop          cwd = recorded
//!
//! DisposableClone::allocate()
//!     Isolated  $TMP/gocl-XXXX/<name>    temp root removed with the clone
//!     InPlace   <cwd>/<name>             refused if it already exists
//!     arm()                              set after a successful clone
//!     remove()  / Drop                   deletes the tree when armed
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::TempDir;
use tracing::{debug, warn};

/// Captured working directory, restored when dropped.
#[derive(Debug)]
pub struct WorkingContext {
    original: PathBuf,
    restored: bool,
}

impl WorkingContext {
    /// Records the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read.
    pub fn capture() -> io::Result<Self> {
        let original = std::env::current_dir()?;
        Ok(Self {
            original,
            restored: false,
        })
    }

    #[must_use]
    pub fn original(&self) -> &Path {
        &self.original
    }

    /// Changes the process directory to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory change fails.
    pub fn enter(&mut self, target: &Path) -> io::Result<()> {
        std::env::set_current_dir(target)?;
        self.restored = false;
        debug!(path = %target.display(), "entered directory");
        Ok(())
    }

    /// Returns to the captured directory. Attempted once; not retried on drop.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory change fails.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        std::env::set_current_dir(&self.original)
    }
}

impl Drop for WorkingContext {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(path = %self.original.display(), error = %e, "failed to restore working directory");
        }
    }
}

/// Where clones are placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloneLayout {
    /// A fresh temporary directory per run.
    #[default]
    Isolated,
    /// `<cwd>/<short name>`.
    InPlace,
}

/// A clone destination owned by exactly one run.
#[derive(Debug)]
pub struct DisposableClone {
    root: PathBuf,
    temp: Option<TempDir>,
    armed: bool,
}

impl DisposableClone {
    /// Picks a destination for `short_name` without creating it.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` for an in-place destination that is already
    /// on disk, or the error from creating the temporary root.
    pub fn allocate(layout: CloneLayout, base: &Path, short_name: &str) -> io::Result<Self> {
        match layout {
            CloneLayout::InPlace => {
                let root = base.join(short_name);
                if root.exists() {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("destination {} already exists", root.display()),
                    ));
                }
                Ok(Self {
                    root,
                    temp: None,
                    armed: false,
                })
            }
            CloneLayout::Isolated => {
                let temp = tempfile::Builder::new().prefix("gocl-").tempdir()?;
                let root = temp.path().join(short_name);
                Ok(Self {
                    root,
                    temp: Some(temp),
                    armed: false,
                })
            }
        }
    }

    /// Clone root.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Marks the tree as acquired so it is deleted on removal.
    pub const fn arm(&mut self) {
        self.armed = true;
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Deletes the clone tree (and the temporary root, if any).
    ///
    /// # Errors
    ///
    /// Returns the removal error. The tree is not retried on drop.
    pub fn remove(mut self) -> io::Result<()> {
        self.remove_tree()
    }

    fn remove_tree(&mut self) -> io::Result<()> {
        let armed = std::mem::take(&mut self.armed);
        let result = if armed && self.root.exists() {
            debug!(path = %self.root.display(), "removing clone");
            std::fs::remove_dir_all(&self.root)
        } else {
            Ok(())
        };
        if let Some(temp) = self.temp.take()
            && let Err(e) = temp.close()
        {
            debug!(error = %e, "failed to remove temporary root");
        }
        result
    }
}

impl Drop for DisposableClone {
    fn drop(&mut self) {
        if let Err(e) = self.remove_tree() {
            warn!(path = %self.root.display(), error = %e, "failed to remove clone");
        }
    }
}
