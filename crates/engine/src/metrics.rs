// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync metrics seam.

use std::time::Duration;
use tracing::info;

pub const SYNC_DURATION_METRIC: &str = "DesiredLRPSyncDuration";

/// Receives the duration metric the processor emits at each tick end.
pub trait SyncMetrics: Send + Sync + 'static {
    fn sync_duration(&self, duration: Duration);
}

/// Emits metrics as structured log events.
#[derive(Clone, Default)]
pub struct TracingMetrics;

impl SyncMetrics for TracingMetrics {
    fn sync_duration(&self, duration: Duration) {
        info!(
            target: "shep::metrics",
            metric = SYNC_DURATION_METRIC,
            nanos = duration.as_nanos() as u64,
            "sync complete"
        );
    }
}
