// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake scheduler client for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SchedulerClient, SchedulerError};
use async_trait::async_trait;
use parking_lot::Mutex;
use shep_core::{DesiredLrp, DesiredLrpUpdate, SchedulingInfo};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Recorded call to FakeSchedulerClient
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerCall {
    LrpsByDomain { domain: String },
    Desire { lrp: DesiredLrp },
    Update { app_id: String, update: DesiredLrpUpdate },
    Remove { app_id: String },
    UpsertDomain { domain: String, ttl: Duration },
}

/// Fake scheduler client for testing
///
/// Records every call and returns programmable results.
#[derive(Clone, Default)]
pub struct FakeSchedulerClient {
    inner: Arc<Mutex<FakeSchedulerState>>,
}

#[derive(Default)]
struct FakeSchedulerState {
    calls: Vec<SchedulerCall>,
    existing: Vec<SchedulingInfo>,
    list_error: Option<String>,
    desire_errors: HashMap<String, SchedulerErrorSpec>,
    update_errors: HashMap<String, SchedulerErrorSpec>,
    remove_errors: HashMap<String, SchedulerErrorSpec>,
    upsert_error: Option<String>,
}

/// Cloneable description of the error a call should fail with.
#[derive(Debug, Clone)]
enum SchedulerErrorSpec {
    InvalidRequest(String),
    Transient(String),
}

impl SchedulerErrorSpec {
    fn to_error(&self) -> SchedulerError {
        match self {
            SchedulerErrorSpec::InvalidRequest(message) => {
                SchedulerError::InvalidRequest { message: message.clone() }
            }
            SchedulerErrorSpec::Transient(message) => {
                SchedulerError::Transport(message.clone())
            }
        }
    }
}

impl FakeSchedulerClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the scheduler's current view for `lrps_by_domain`.
    pub fn set_existing(&self, infos: Vec<SchedulingInfo>) {
        self.inner.lock().existing = infos;
    }

    /// Fail every `lrps_by_domain` call.
    pub fn set_list_error(&self, message: &str) {
        self.inner.lock().list_error = Some(message.to_string());
    }

    /// Fail `desire_lrp` for one app with a transient error.
    pub fn set_desire_error(&self, app_id: &str, message: &str) {
        self.inner
            .lock()
            .desire_errors
            .insert(app_id.to_string(), SchedulerErrorSpec::Transient(message.to_string()));
    }

    /// Fail `desire_lrp` for one app with a permanent rejection.
    pub fn set_desire_invalid(&self, app_id: &str, message: &str) {
        self.inner
            .lock()
            .desire_errors
            .insert(app_id.to_string(), SchedulerErrorSpec::InvalidRequest(message.to_string()));
    }

    /// Fail `update_lrp` for one app with a transient error.
    pub fn set_update_error(&self, app_id: &str, message: &str) {
        self.inner
            .lock()
            .update_errors
            .insert(app_id.to_string(), SchedulerErrorSpec::Transient(message.to_string()));
    }

    /// Fail `update_lrp` for one app with a permanent rejection.
    pub fn set_update_invalid(&self, app_id: &str, message: &str) {
        self.inner
            .lock()
            .update_errors
            .insert(app_id.to_string(), SchedulerErrorSpec::InvalidRequest(message.to_string()));
    }

    /// Fail `remove_lrp` for one app with a transient error.
    pub fn set_remove_error(&self, app_id: &str, message: &str) {
        self.inner
            .lock()
            .remove_errors
            .insert(app_id.to_string(), SchedulerErrorSpec::Transient(message.to_string()));
    }

    /// Fail every `upsert_domain` call.
    pub fn set_upsert_error(&self, message: &str) {
        self.inner.lock().upsert_error = Some(message.to_string());
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SchedulerCall> {
        self.inner.lock().calls.clone()
    }

    /// App ids passed to `desire_lrp`, in call order
    pub fn desired_app_ids(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                SchedulerCall::Desire { lrp } => Some(lrp.process_guid.clone()),
                _ => None,
            })
            .collect()
    }

    /// App ids and payloads passed to `update_lrp`, in call order
    pub fn updates(&self) -> Vec<(String, DesiredLrpUpdate)> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                SchedulerCall::Update { app_id, update } => {
                    Some((app_id.clone(), update.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// App ids passed to `remove_lrp`, in call order
    pub fn removed_app_ids(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                SchedulerCall::Remove { app_id } => Some(app_id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Domains passed to `upsert_domain`, in call order
    pub fn upserted_domains(&self) -> Vec<(String, Duration)> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                SchedulerCall::UpsertDomain { domain, ttl } => Some((domain.clone(), *ttl)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl SchedulerClient for FakeSchedulerClient {
    async fn lrps_by_domain(&self, domain: &str) -> Result<Vec<SchedulingInfo>, SchedulerError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SchedulerCall::LrpsByDomain { domain: domain.to_string() });
        if let Some(message) = &inner.list_error {
            return Err(SchedulerError::Transport(message.clone()));
        }
        Ok(inner.existing.clone())
    }

    async fn desire_lrp(&self, lrp: &DesiredLrp) -> Result<(), SchedulerError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SchedulerCall::Desire { lrp: lrp.clone() });
        match inner.desire_errors.get(&lrp.process_guid) {
            Some(spec) => Err(spec.to_error()),
            None => Ok(()),
        }
    }

    async fn update_lrp(
        &self,
        app_id: &str,
        update: &DesiredLrpUpdate,
    ) -> Result<(), SchedulerError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SchedulerCall::Update {
            app_id: app_id.to_string(),
            update: update.clone(),
        });
        match inner.update_errors.get(app_id) {
            Some(spec) => Err(spec.to_error()),
            None => Ok(()),
        }
    }

    async fn remove_lrp(&self, app_id: &str) -> Result<(), SchedulerError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SchedulerCall::Remove { app_id: app_id.to_string() });
        match inner.remove_errors.get(app_id) {
            Some(spec) => Err(spec.to_error()),
            None => Ok(()),
        }
    }

    async fn upsert_domain(&self, domain: &str, ttl: Duration) -> Result<(), SchedulerError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SchedulerCall::UpsertDomain { domain: domain.to_string(), ttl });
        if let Some(message) = &inner.upsert_error {
            return Err(SchedulerError::Transport(message.clone()));
        }
        Ok(())
    }
}
