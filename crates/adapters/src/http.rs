// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared HTTP client construction.

use std::time::Duration;
use thiserror::Error;

/// Process-wide HTTP client settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Timeout applied to every request end to end.
    pub communication_timeout: Duration,
    /// Skip TLS certificate verification (lab deployments only).
    pub skip_cert_verify: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { communication_timeout: Duration::from_secs(30), skip_cert_verify: false }
    }
}

const DIAL_TIMEOUT: Duration = Duration::from_secs(10);
const KEEP_ALIVE: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
#[error("failed to build HTTP client: {0}")]
pub struct HttpClientError(String);

/// Build the reqwest client every adapter shares its settings with.
pub fn build_client(config: &HttpConfig) -> Result<reqwest::Client, HttpClientError> {
    reqwest::Client::builder()
        .timeout(config.communication_timeout)
        .connect_timeout(DIAL_TIMEOUT)
        .tcp_keepalive(KEEP_ALIVE)
        .danger_accept_invalid_certs(config.skip_cert_verify)
        .build()
        .map_err(|e| HttpClientError(e.to_string()))
}
