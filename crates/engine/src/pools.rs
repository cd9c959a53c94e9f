// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded worker pools for the create and update paths.
//!
//! Each pool consumes spec batches, runs up to `pool_size` units
//! concurrently, and waits for a batch to drain before taking the next, so
//! batches stay FIFO while units within a batch complete in any order.
//!
//! Error policy: build failures and scheduler errors go to the pool's error
//! channel, except permanent `InvalidRequest` rejections, which are logged
//! and swallowed so one bad app cannot freeze the freshness lease.

use crate::error::SyncError;
use futures_util::StreamExt;
use shep_adapters::SchedulerClient;
use shep_core::{
    merge_routing_info, AppSpec, CfRoute, DesiredLrpUpdate, SchedulingInfo,
};
use shep_recipes::RecipeBuilders;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Desire a workload for every spec on the missing stream.
pub async fn run_create_pool<S, B>(
    scheduler: Arc<S>,
    builders: Arc<B>,
    pool_size: usize,
    mut specs: mpsc::Receiver<Vec<AppSpec>>,
    errors: mpsc::Sender<SyncError>,
    cancel: CancellationToken,
) where
    S: SchedulerClient,
    B: RecipeBuilders,
{
    loop {
        let batch = tokio::select! {
            _ = cancel.cancelled() => return,
            batch = specs.recv() => batch,
        };
        let Some(batch) = batch else {
            return;
        };

        futures_util::stream::iter(batch)
            .for_each_concurrent(pool_size, |spec| {
                let scheduler = &scheduler;
                let builders = &builders;
                let errors = &errors;
                let cancel = &cancel;
                async move {
                    tokio::select! {
                        _ = cancel.cancelled() => {}
                        _ = create_one(scheduler.as_ref(), builders.as_ref(), spec, errors, cancel) => {}
                    }
                }
            })
            .await;
    }
}

async fn create_one<S, B>(
    scheduler: &S,
    builders: &B,
    spec: AppSpec,
    errors: &mpsc::Sender<SyncError>,
    cancel: &CancellationToken,
) where
    S: SchedulerClient,
    B: RecipeBuilders,
{
    let lrp = match builders.build(&spec) {
        Ok(lrp) => lrp,
        Err(e) => {
            warn!(app_id = %spec.app_id, error = %e, "failed to build workload");
            report(errors, SyncError::Build { app_id: spec.app_id, source: e }, cancel).await;
            return;
        }
    };

    debug!(app_id = %spec.app_id, "desiring workload");
    match scheduler.desire_lrp(&lrp).await {
        Ok(()) => {}
        Err(e) if e.is_invalid_request() => {
            warn!(app_id = %spec.app_id, error = %e, "scheduler rejected create; dropping");
        }
        Err(e) => report(errors, e.into(), cancel).await,
    }
}

/// Issue a partial update for every spec on the stale stream.
pub async fn run_update_pool<S, B>(
    scheduler: Arc<S>,
    builders: Arc<B>,
    existing: Arc<HashMap<String, SchedulingInfo>>,
    pool_size: usize,
    mut specs: mpsc::Receiver<Vec<AppSpec>>,
    errors: mpsc::Sender<SyncError>,
    cancel: CancellationToken,
) where
    S: SchedulerClient,
    B: RecipeBuilders,
{
    loop {
        let batch = tokio::select! {
            _ = cancel.cancelled() => return,
            batch = specs.recv() => batch,
        };
        let Some(batch) = batch else {
            return;
        };

        futures_util::stream::iter(batch)
            .for_each_concurrent(pool_size, |spec| {
                let scheduler = &scheduler;
                let builders = &builders;
                let existing = &existing;
                let errors = &errors;
                let cancel = &cancel;
                async move {
                    tokio::select! {
                        _ = cancel.cancelled() => {}
                        _ = update_one(
                            scheduler.as_ref(),
                            builders.as_ref(),
                            existing,
                            spec,
                            errors,
                            cancel,
                        ) => {}
                    }
                }
            })
            .await;
    }
}

async fn update_one<S, B>(
    scheduler: &S,
    builders: &B,
    existing: &HashMap<String, SchedulingInfo>,
    spec: AppSpec,
    errors: &mpsc::Sender<SyncError>,
    cancel: &CancellationToken,
) where
    S: SchedulerClient,
    B: RecipeBuilders,
{
    let Some(info) = existing.get(&spec.app_id) else {
        // Stale specs derive from the existing set; a miss here means the
        // catalog delivered an app the diff never saw.
        debug!(app_id = %spec.app_id, "stale spec without scheduler state; skipping");
        return;
    };

    let ports = match builders.exposed_ports(&spec) {
        Ok(ports) => ports,
        Err(e) => {
            warn!(app_id = %spec.app_id, error = %e, "failed to derive exposed ports");
            report(errors, SyncError::Build { app_id: spec.app_id, source: e }, cancel).await;
            return;
        }
    };

    let fresh = CfRoute::routing_info(&CfRoute::from_catalog_routes(&spec.routes, &ports));
    let update = DesiredLrpUpdate {
        instances: Some(spec.instance_count),
        annotation: Some(spec.version_tag.clone()),
        routes: merge_routing_info(fresh, &info.routing_info),
    };

    debug!(app_id = %spec.app_id, "updating workload");
    match scheduler.update_lrp(&spec.app_id, &update).await {
        Ok(()) => {}
        Err(e) if e.is_invalid_request() => {
            warn!(app_id = %spec.app_id, error = %e, "scheduler rejected update; dropping");
        }
        Err(e) => report(errors, e.into(), cancel).await,
    }
}

async fn report(errors: &mpsc::Sender<SyncError>, error: SyncError, cancel: &CancellationToken) {
    tokio::select! {
        _ = cancel.cancelled() => {}
        _ = errors.send(error) => {}
    }
}

#[cfg(test)]
#[path = "pools_tests.rs"]
mod tests;
