// gocl-rs: Go clone-and-install helper
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository reachability checks.
//!
//! ```text
//! HttpProbe::new(timeout)
//!        |
//!        v
//!   probe(url) --GET--> status code
//!        |
//!        v
//!   verify_reachable()
//!     200 | 204  --> Ok
//!     other      --> HttpError { status }
//!     timeout    --> Timeout
//!     transport  --> Reqwest
//! ```

use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::Client;
use tracing::debug;

use crate::error::NetworkError;

/// Timeout applied to a probe unless configured otherwise.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Capability to ask whether a URL answers.
pub trait ReachabilityProbe: Send + Sync {
    /// Issues one request and returns the HTTP status code.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` on transport failure or timeout.
    fn probe<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<u16, NetworkError>>;
}

/// Returns `true` for the status codes that count as a reachable repository.
#[must_use]
pub const fn is_accepted_status(status: u16) -> bool {
    matches!(status, 200 | 204)
}

/// Probes `url` and fails unless it answers 200 or 204.
///
/// # Errors
///
/// Returns `NetworkError::HttpError` for any other status, or the probe's
/// transport error.
pub async fn verify_reachable<P>(probe: &P, url: &str) -> Result<(), NetworkError>
where
    P: ReachabilityProbe + ?Sized,
{
    let status = probe.probe(url).await?;
    debug!(url, status, "probe answered");
    if is_accepted_status(status) {
        Ok(())
    } else {
        Err(NetworkError::HttpError {
            status,
            url: url.to_string(),
        })
    }
}

/// HTTP GET probe backed by reqwest with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    timeout: Duration,
}

impl HttpProbe {
    /// Creates a probe whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Reqwest` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .user_agent(format!("gocl-rs/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl ReachabilityProbe for HttpProbe {
    fn probe<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<u16, NetworkError>> {
        Box::pin(async move {
            let response = self.client.get(url).send().await.map_err(|e| {
                if e.is_timeout() {
                    NetworkError::Timeout {
                        url: url.to_string(),
                        timeout_secs: self.timeout.as_secs(),
                    }
                } else {
                    NetworkError::Reqwest(e)
                }
            })?;
            Ok(response.status().as_u16())
        })
    }
}
