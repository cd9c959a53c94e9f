// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The merged error type flowing through the pipeline's fan-in.

use shep_adapters::{CatalogError, SchedulerError};
use shep_recipes::BuildError;
use thiserror::Error;

/// Any error a pipeline stage can report during one tick.
///
/// Per-app errors never stop the pipeline; their only effects are to
/// suppress the freshness bump and, for fingerprint errors, to gate the
/// delete phase.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("building workload for {app_id}: {source}")]
    Build {
        app_id: String,
        #[source]
        source: BuildError,
    },

    #[error("scheduler: {0}")]
    Scheduler(#[from] SchedulerError),
}
