// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler-side workload types.
//!
//! [`SchedulingInfo`] is the scheduler's current view of one app, restricted
//! to what the diff needs. [`DesiredLrp`] is the full workload description a
//! recipe builder produces; [`DesiredLrpUpdate`] is the partial payload the
//! update path issues for stale apps.

use crate::app::{EnvVar, SecurityGroupRule};
use crate::routes::RoutingInfo;
use serde::{Deserialize, Serialize};

/// The scheduler's current view of one app, keyed by `app_id`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchedulingInfo {
    #[serde(rename = "process_guid")]
    pub app_id: String,
    /// Opaque version annotation; compared by byte equality against the
    /// catalog's fingerprint tag.
    #[serde(rename = "annotation", default)]
    pub version_tag: String,
    #[serde(default)]
    pub routing_info: RoutingInfo,
}

impl SchedulingInfo {
    pub fn new(app_id: impl Into<String>, version_tag: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            version_tag: version_tag.into(),
            routing_info: RoutingInfo::new(),
        }
    }
}

/// A complete desired-workload description for the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesiredLrp {
    pub process_guid: String,
    pub domain: String,
    pub instances: u32,
    pub root_fs: String,
    pub stack: String,
    pub ports: Vec<u16>,
    #[serde(default)]
    pub routes: RoutingInfo,
    /// Version tag of the catalog spec this workload was built from.
    pub annotation: String,
    pub memory_mb: u32,
    pub disk_mb: u32,
    pub cpu_weight: u32,
    pub privileged: bool,
    #[serde(default)]
    pub environment: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<Action>,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor: Option<Action>,
    #[serde(default)]
    pub start_timeout_secs: Option<u64>,
    #[serde(default)]
    pub egress_rules: Vec<SecurityGroupRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
    #[serde(default)]
    pub allow_ssh: bool,
}

/// Partial update for a stale app.
///
/// Carries the full router map, not only the owned entry, so that foreign
/// router keys survive the write.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DesiredLrpUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instances: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(default)]
    pub routes: RoutingInfo,
}

/// Executable step of a workload description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Download {
        from: String,
        to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cache_key: Option<String>,
    },
    Run {
        path: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        env: Vec<EnvVar>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resource_limits: Option<ResourceLimits>,
    },
    Parallel(Vec<Action>),
    Serial(Vec<Action>),
}

/// Per-process resource limits for a run action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nofile: Option<u64>,
}

/// Where the workload's log lines are attributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub guid: String,
    pub source_name: String,
}

#[cfg(test)]
#[path = "scheduling_tests.rs"]
mod tests;
