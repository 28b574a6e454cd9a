// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Module manifest bootstrap.
//!
//! ```text
//! go.sum present ----------------------------------> AlreadyPresent
//! go mod tidy ok ----------------------------------> Tidied
//! tidy failed, go.mod present ---------------------> Err(Tidy)
//! tidy failed, no go.mod --> go mod init --fail----> Err(Init)
//!                               |
//!                               ok --> go mod tidy --fail--> Err(RetryTidy)
//!                                          |
//!                                          ok ----> Initialized
//! ```

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{BootstrapError, BootstrapStep};
use crate::toolchain::Toolchain;

pub const GO_SUM: &str = "go.sum";
pub const GO_MOD: &str = "go.mod";

/// What bootstrap had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// `go.sum` already existed; nothing ran.
    AlreadyPresent,
    /// A single `go mod tidy` was enough.
    Tidied,
    /// A manifest was created with `go mod init` and then tidied.
    Initialized,
}

/// Ensures `dir` has a usable module manifest.
///
/// # Errors
///
/// Returns the last failing sub-step. `go mod init` only runs when `go.mod`
/// is missing.
pub async fn bootstrap<T>(
    toolchain: &T,
    dir: &Path,
    module_path: &str,
) -> Result<BootstrapOutcome, BootstrapError>
where
    T: Toolchain + ?Sized,
{
    if dir.join(GO_SUM).exists() {
        debug!(dir = %dir.display(), "go.sum present, skipping bootstrap");
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    let Err(tidy_err) = toolchain.tidy(dir).await else {
        return Ok(BootstrapOutcome::Tidied);
    };

    if dir.join(GO_MOD).exists() {
        return Err(BootstrapError {
            step: BootstrapStep::Tidy,
            source: tidy_err,
        });
    }

    warn!(error = %tidy_err, module = module_path, "go mod tidy failed without go.mod, initializing module");
    toolchain
        .init(dir, module_path)
        .await
        .map_err(|source| BootstrapError {
            step: BootstrapStep::Init,
            source,
        })?;

    toolchain.tidy(dir).await.map_err(|source| BootstrapError {
        step: BootstrapStep::RetryTidy,
        source,
    })?;

    info!(module = module_path, "module initialized");
    Ok(BootstrapOutcome::Initialized)
}
