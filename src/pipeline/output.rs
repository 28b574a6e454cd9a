// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Where the built program goes.

use std::path::{Component, Path, PathBuf};

/// Build destination for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputSpec {
    /// `go install` into the toolchain's bin directory.
    #[default]
    Install,
    /// `go build -o <dir>/<name>`.
    Directory {
        dir: PathBuf,
        /// Artifact name; defaults to the repository short name.
        name: Option<String>,
    },
}

impl OutputSpec {
    /// Builds an output spec from optional CLI values.
    ///
    /// A name without a directory has nothing to apply to and is dropped.
    #[must_use]
    pub fn from_parts(dir: Option<PathBuf>, name: Option<String>) -> Self {
        match dir {
            Some(dir) => Self::Directory {
                dir,
                name: name.filter(|n| !n.is_empty()),
            },
            None => Self::Install,
        }
    }

    /// Absolute artifact path, or `None` for [`OutputSpec::Install`].
    ///
    /// Relative directories are anchored at `original`, the directory the
    /// run started in, not at the clone.
    #[must_use]
    pub fn artifact_path(&self, original: &Path, short_name: &str) -> Option<PathBuf> {
        let Self::Directory { dir, name } = self else {
            return None;
        };
        let name = name.as_deref().unwrap_or(short_name);
        Some(join_lexical(original, dir).join(name))
    }
}

/// Joins `rel` onto `base`, dropping `.` components.
fn join_lexical(base: &Path, rel: &Path) -> PathBuf {
    if rel.is_absolute() {
        return rel.to_path_buf();
    }
    let mut out = base.to_path_buf();
    for component in rel.components() {
        match component {
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}
