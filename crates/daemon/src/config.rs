// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration from command-line flags.

use clap::Parser;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid lifecycle mapping: {0}")]
    InvalidLifecycles(String),
}

/// Desired-state reconciler for app workloads.
#[derive(Debug, Parser)]
#[command(name = "shepd")]
pub struct Config {
    /// URL of the scheduler API
    #[arg(long = "diegoAPIURL")]
    pub diego_api_url: String,

    /// Comma-separated list of consul server URLs (scheme://ip:port)
    #[arg(long = "consulCluster")]
    pub consul_cluster: String,

    /// Base URL of the catalog
    #[arg(long = "ccBaseURL")]
    pub cc_base_url: String,

    /// Basic auth username for the catalog bulk API
    #[arg(long = "ccUsername")]
    pub cc_username: String,

    /// Basic auth password for the catalog bulk API
    #[arg(long = "ccPassword")]
    pub cc_password: String,

    /// Timeout applied to all HTTP requests
    #[arg(long = "communicationTimeout", default_value = "30s", value_parser = parse_duration)]
    pub communication_timeout: Duration,

    /// Interval at which to poll the bulk API
    #[arg(long = "pollingInterval", default_value = "30s", value_parser = parse_duration)]
    pub polling_interval: Duration,

    /// Duration of the app domain; bumped on every clean sync
    #[arg(long = "domainTTL", default_value = "2m", value_parser = parse_duration)]
    pub domain_ttl: Duration,

    /// Number of apps to fetch at once from the bulk API
    #[arg(long = "bulkBatchSize", default_value_t = 500)]
    pub bulk_batch_size: usize,

    /// Skip TLS certificate verification
    #[arg(long = "skipCertVerify")]
    pub skip_cert_verify: bool,

    /// TTL for the leader lock
    #[arg(long = "lockTTL", default_value = "15s", value_parser = parse_duration)]
    pub lock_ttl: Duration,

    /// Interval to wait before retrying a failed lock acquisition
    #[arg(long = "heartbeatRetryInterval", default_value = "5s", value_parser = parse_duration)]
    pub heartbeat_retry_interval: Duration,

    /// App lifecycle bundle mapping (JSON: lifecycle name => bundle path)
    #[arg(long = "lifecycles", default_value = "")]
    pub lifecycles: String,

    /// URL of the file server hosting lifecycle bundles
    #[arg(long = "fileServerURL", default_value = "")]
    pub file_server_url: String,
}

impl Config {
    /// Parse the `--lifecycles` JSON mapping.
    pub fn lifecycle_map(&self) -> Result<HashMap<String, String>, ConfigError> {
        serde_json::from_str(&self.lifecycles)
            .map_err(|e| ConfigError::InvalidLifecycles(e.to_string()))
    }
}

/// Parse a duration string like "30s", "5m", "1h" into a Duration
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the numeric prefix
    let (num_str, suffix) = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| (&s[..i], &s[i..]))
        .unwrap_or((s, ""));

    let num: u64 = num_str.parse().map_err(|_| format!("invalid number in duration: {}", s))?;

    let multiplier = match suffix.trim() {
        "ms" | "millis" | "millisecond" | "milliseconds" => {
            return Ok(Duration::from_millis(num));
        }
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3600,
        other => return Err(format!("unknown duration suffix: {}", other)),
    };

    Ok(Duration::from_secs(num * multiplier))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
