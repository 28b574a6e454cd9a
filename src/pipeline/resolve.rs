// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build target resolution inside a clone.
//!
//! ```text
//! priority  rule         candidate                 missing
//! 1         CustomPath   <root>/<custom>           hard error
//! 2         V2Cmd        <root>/v2/cmd/<name>      next rule
//! 3         Cmd          <root>/cmd/<name>         next rule
//! 4         Root         <root>                    (not checked)
//! ```

use std::path::{Component, Path, PathBuf};

use crate::error::ResolveError;

/// Existence check used by resolution.
pub trait PathProbe: Send + Sync {
    fn is_dir(&self, path: &Path) -> bool;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdPathProbe;

impl PathProbe for StdPathProbe {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// One candidate location for the buildable package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateRule {
    CustomPath,
    V2Cmd,
    Cmd,
    Root,
}

impl CandidateRule {
    /// Rules in evaluation order.
    pub const ORDER: [Self; 4] = [Self::CustomPath, Self::V2Cmd, Self::Cmd, Self::Root];

    /// Candidate directory for this rule, or `None` when the rule does not apply.
    #[must_use]
    pub fn candidate(self, root: &Path, short_name: &str, custom: Option<&Path>) -> Option<PathBuf> {
        match self {
            Self::CustomPath => custom.map(|sub| root.join(sub)),
            Self::V2Cmd => Some(root.join("v2").join("cmd").join(short_name)),
            Self::Cmd => Some(root.join("cmd").join(short_name)),
            Self::Root => Some(root.to_path_buf()),
        }
    }

    /// Whether the candidate must exist to be selected.
    #[must_use]
    pub const fn requires_existence(self) -> bool {
        !matches!(self, Self::Root)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CustomPath => "custom path",
            Self::V2Cmd => "v2/cmd/<name>",
            Self::Cmd => "cmd/<name>",
            Self::Root => "repository root",
        }
    }
}

/// The directory chosen to build from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    path: PathBuf,
    rule: CandidateRule,
}

impl BuildTarget {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn rule(&self) -> CandidateRule {
        self.rule
    }
}

/// Rejects overrides that are absolute or step outside the clone.
fn check_custom(custom: &Path) -> Result<(), ResolveError> {
    let escapes = custom.components().any(|c| {
        matches!(
            c,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });
    if escapes {
        Err(ResolveError::CustomPathOutsideClone {
            path: custom.to_path_buf(),
        })
    } else {
        Ok(())
    }
}

/// Picks the highest-priority existing candidate under `root`.
///
/// An explicit `custom` path that does not exist is an error; no other rule
/// is consulted in that case.
///
/// # Errors
///
/// Returns a `ResolveError` when the custom path is missing or escapes the clone.
pub fn resolve_target<P>(
    root: &Path,
    short_name: &str,
    custom: Option<&Path>,
    probe: &P,
) -> Result<BuildTarget, ResolveError>
where
    P: PathProbe + ?Sized,
{
    let custom = custom.filter(|c| !c.as_os_str().is_empty());
    if let Some(custom) = custom {
        check_custom(custom)?;
    }

    for rule in CandidateRule::ORDER {
        let Some(path) = rule.candidate(root, short_name, custom) else {
            continue;
        };
        if !rule.requires_existence() || probe.is_dir(&path) {
            return Ok(BuildTarget { path, rule });
        }
        if rule == CandidateRule::CustomPath {
            return Err(ResolveError::CustomPathNotFound {
                path: custom.map(Path::to_path_buf).unwrap_or_default(),
            });
        }
    }

    // Root never requires existence, so the loop always returns.
    Ok(BuildTarget {
        path: root.to_path_buf(),
        rule: CandidateRule::Root,
    })
}
