// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository reference normalization.
//!
//! ```text
//! "github.com/example/tool@v1.2.0"
//!     strip "@..."      --> "github.com/example/tool"
//!     add "https://"    --> "https://github.com/example/tool"
//!     last segment      --> "tool"
//! ```

use std::fmt;

const HTTPS: &str = "https://";

/// Prefixes that count as an explicit scheme.
const SCHEMES: [&str; 3] = [HTTPS, "http://", "file://"];

/// A user-supplied repository reference in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReference {
    raw: String,
    url: String,
    short_name: String,
}

impl RepositoryReference {
    /// The string as the user typed it.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Scheme-qualified URL without any version suffix.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Last path segment; clone directory, module suffix and default artifact name.
    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// URL with its scheme removed, used as the `go mod init` module path.
    #[must_use]
    pub fn module_path(&self) -> &str {
        let path = strip_scheme(&self.url).trim_end_matches('/');
        path.strip_suffix(".git").unwrap_or(path)
    }

    /// Whether a usable short name could be derived.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.short_name.is_empty()
            && self.short_name != "."
            && self.short_name != ".."
            && !strip_scheme(&self.url).is_empty()
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

fn strip_scheme(url: &str) -> &str {
    SCHEMES
        .iter()
        .find_map(|scheme| url.strip_prefix(scheme))
        .unwrap_or(url)
}

/// Normalizes a raw reference. Never fails: malformed input surfaces later.
#[must_use]
pub fn normalize(raw: &str) -> RepositoryReference {
    let trimmed = raw.trim();
    let unversioned = trimmed.split_once('@').map_or(trimmed, |(head, _)| head);

    let url = if SCHEMES.iter().any(|scheme| unversioned.starts_with(scheme)) {
        unversioned.to_string()
    } else {
        format!("{HTTPS}{unversioned}")
    };

    let short_name = strip_scheme(&url)
        .split('/')
        .rfind(|segment| !segment.is_empty())
        .map(|segment| segment.strip_suffix(".git").unwrap_or(segment))
        .unwrap_or_default()
        .to_string();

    RepositoryReference {
        raw: raw.to_string(),
        url,
        short_name,
    }
}
