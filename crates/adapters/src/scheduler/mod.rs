// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler client: the thin capability the reconciler uses to list,
//! create, update, and delete scheduled workloads and to renew the
//! freshness lease.

mod http;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSchedulerClient, SchedulerCall};

pub use http::HttpSchedulerClient;

use async_trait::async_trait;
use serde::Deserialize;
use shep_core::{DesiredLrp, DesiredLrpUpdate, SchedulingInfo};
use std::time::Duration;
use thiserror::Error;

/// Errors from scheduler operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The scheduler rejected the payload as permanently invalid.
    /// Retrying without a catalog change is pointless.
    #[error("scheduler rejected the request: {message}")]
    InvalidRequest { message: String },

    #[error("scheduler responded with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("scheduler transport error: {0}")]
    Transport(String),
}

impl SchedulerError {
    /// Whether this error is a permanent rejection of the payload.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, SchedulerError::InvalidRequest { .. })
    }
}

/// Error body the scheduler returns on failed requests.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
}

pub(crate) const INVALID_REQUEST_ERROR: &str = "invalid_request";

/// Map a failed response to the error taxonomy.
pub(crate) fn classify_failure(status: u16, body: ApiErrorBody) -> SchedulerError {
    if body.error == INVALID_REQUEST_ERROR {
        SchedulerError::InvalidRequest { message: body.message }
    } else {
        SchedulerError::Api { status, message: body.message }
    }
}

#[async_trait]
pub trait SchedulerClient: Send + Sync + 'static {
    /// List the scheduler's current view of every workload in `domain`.
    async fn lrps_by_domain(&self, domain: &str) -> Result<Vec<SchedulingInfo>, SchedulerError>;

    /// Create a desired workload.
    async fn desire_lrp(&self, lrp: &DesiredLrp) -> Result<(), SchedulerError>;

    /// Apply a partial update to an existing workload.
    async fn update_lrp(
        &self,
        app_id: &str,
        update: &DesiredLrpUpdate,
    ) -> Result<(), SchedulerError>;

    /// Remove a desired workload.
    async fn remove_lrp(&self, app_id: &str) -> Result<(), SchedulerError>;

    /// Renew the freshness lease for `domain`.
    async fn upsert_domain(&self, domain: &str, ttl: Duration) -> Result<(), SchedulerError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
