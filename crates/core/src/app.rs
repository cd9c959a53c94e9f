// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Full app description as supplied by the catalog's bulk detail endpoint.

use serde::{Deserialize, Serialize};

/// One desired app, as the catalog describes it.
///
/// Exactly one of `source_uri` / `image_uri` is populated for a valid spec;
/// the recipe builders reject anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSpec {
    #[serde(rename = "process_guid")]
    pub app_id: String,
    #[serde(rename = "etag")]
    pub version_tag: String,
    pub instance_count: u32,
    #[serde(default)]
    pub source_uri: Option<String>,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub start_command: String,
    /// Opaque launch metadata recorded at staging time (JSON; may carry the
    /// container's exposed ports).
    #[serde(default)]
    pub execution_metadata: String,
    pub stack: String,
    #[serde(default)]
    pub environment: Vec<EnvVar>,
    #[serde(default)]
    pub file_descriptors: u64,
    pub memory_mb: u32,
    pub disk_mb: u32,
    #[serde(default)]
    pub routes: Vec<HttpRoute>,
    #[serde(default)]
    pub allow_ssh: bool,
    #[serde(default)]
    pub health_check: HealthCheckType,
    #[serde(default)]
    pub health_check_timeout_secs: Option<u64>,
    #[serde(default)]
    pub egress_rules: Vec<SecurityGroupRule>,
    #[serde(default)]
    pub log_guid: String,
}

/// Environment variable passed through to the workload verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// A catalog-side HTTP route: hostname plus an optional explicit port.
///
/// Routes without a port bind to every default port the recipe builder
/// advertises for the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRoute {
    pub hostname: String,
    #[serde(default)]
    pub port: Option<u16>,
}

/// How the scheduler should decide an instance is healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCheckType {
    /// Probe the first exposed port.
    #[default]
    Port,
    /// Only require the process to stay up.
    Process,
    /// No health checking at all.
    None,
}

/// One egress policy rule, passed through to the scheduler unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupRule {
    pub protocol: String,
    #[serde(default)]
    pub destinations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_range: Option<PortRange>,
}

/// Inclusive port range for an egress rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
