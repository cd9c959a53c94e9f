// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake builder set for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::builder::{BuildError, RecipeBuilders, DEFAULT_PORT};
use parking_lot::Mutex;
use shep_core::{Action, AppSpec, CfRoute, DesiredLrp, APP_DOMAIN};
use std::collections::HashMap;
use std::sync::Arc;

/// Recorded call to FakeRecipeBuilders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderCall {
    Build { app_id: String },
    ExposedPorts { app_id: String },
}

/// Fake builder set for testing
///
/// Builds a minimal workload straight from the spec and records all calls;
/// failures are programmable per app.
#[derive(Clone, Default)]
pub struct FakeRecipeBuilders {
    inner: Arc<Mutex<FakeBuilderState>>,
}

#[derive(Default)]
struct FakeBuilderState {
    calls: Vec<BuilderCall>,
    build_errors: HashMap<String, BuildError>,
    ports: HashMap<String, Vec<u16>>,
    ports_errors: HashMap<String, BuildError>,
}

impl FakeRecipeBuilders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<BuilderCall> {
        self.inner.lock().calls.clone()
    }

    /// App ids `build` was invoked for, in call order
    pub fn built_app_ids(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                BuilderCall::Build { app_id } => Some(app_id.clone()),
                BuilderCall::ExposedPorts { .. } => None,
            })
            .collect()
    }

    /// Fail `build` for one app
    pub fn set_build_error(&self, app_id: &str, error: BuildError) {
        self.inner.lock().build_errors.insert(app_id.to_string(), error);
    }

    /// Override the ports `exposed_ports` reports for one app
    pub fn set_exposed_ports(&self, app_id: &str, ports: Vec<u16>) {
        self.inner.lock().ports.insert(app_id.to_string(), ports);
    }

    /// Fail `exposed_ports` for one app
    pub fn set_exposed_ports_error(&self, app_id: &str, error: BuildError) {
        self.inner.lock().ports_errors.insert(app_id.to_string(), error);
    }
}

impl RecipeBuilders for FakeRecipeBuilders {
    fn build(&self, spec: &AppSpec) -> Result<DesiredLrp, BuildError> {
        let mut inner = self.inner.lock();
        inner.calls.push(BuilderCall::Build { app_id: spec.app_id.clone() });
        if let Some(err) = inner.build_errors.get(&spec.app_id) {
            return Err(err.clone());
        }

        Ok(DesiredLrp {
            process_guid: spec.app_id.clone(),
            domain: APP_DOMAIN.to_string(),
            instances: spec.instance_count,
            root_fs: format!("preloaded:{}", spec.stack),
            stack: spec.stack.clone(),
            ports: vec![DEFAULT_PORT],
            routes: CfRoute::routing_info(&CfRoute::from_catalog_routes(
                &spec.routes,
                &[DEFAULT_PORT],
            )),
            annotation: spec.version_tag.clone(),
            memory_mb: spec.memory_mb,
            disk_mb: spec.disk_mb,
            cpu_weight: 1,
            privileged: false,
            environment: Vec::new(),
            setup: None,
            action: Action::Run {
                path: "/tmp/lifecycle/launcher".to_string(),
                args: vec!["app".to_string()],
                env: Vec::new(),
                resource_limits: None,
            },
            monitor: None,
            start_timeout_secs: None,
            egress_rules: Vec::new(),
            log: None,
            allow_ssh: spec.allow_ssh,
        })
    }

    fn exposed_ports(&self, spec: &AppSpec) -> Result<Vec<u16>, BuildError> {
        let mut inner = self.inner.lock();
        inner.calls.push(BuilderCall::ExposedPorts { app_id: spec.app_id.clone() });
        if let Some(err) = inner.ports_errors.get(&spec.app_id) {
            return Err(err.clone());
        }
        Ok(inner.ports.get(&spec.app_id).cloned().unwrap_or_else(|| vec![DEFAULT_PORT]))
    }
}
