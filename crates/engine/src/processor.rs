// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The reconciler: one `sync` per tick, ticks spaced by the polling
//! interval.
//!
//! A tick lists the scheduler's view of the app domain, streams the
//! catalog's fingerprints through the differ, resolves the missing and
//! stale sets to full specs, fans them out to the create and update pools,
//! and drains the merged error stream. Deletions run only when the
//! fingerprint stream completed without error; the freshness lease is
//! renewed only when the whole tick was clean.

use crate::differ::Differ;
use crate::error::SyncError;
use crate::fanin::{map_into, merge};
use crate::metrics::SyncMetrics;
use crate::pools::{run_create_pool, run_update_pool};
use crate::tee::counting_tee;
use shep_adapters::{CatalogFetcher, SchedulerClient};
use shep_core::{Clock, SchedulingInfo, APP_DOMAIN};
use shep_recipes::RecipeBuilders;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Pause between the end of one tick and the start of the next.
    pub polling_interval: Duration,
    /// TTL written on every freshness bump.
    pub domain_ttl: Duration,
    /// Concurrent units per worker pool.
    pub pool_size: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            polling_interval: Duration::from_secs(30),
            domain_ttl: Duration::from_secs(120),
            pool_size: 10,
        }
    }
}

/// How one tick ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The tick ran to completion (possibly with errors).
    Completed,
    /// A termination signal interrupted the tick.
    Stopped,
}

pub struct Processor<S, F, B, C> {
    scheduler: Arc<S>,
    fetcher: Arc<F>,
    builders: Arc<B>,
    metrics: Arc<dyn SyncMetrics>,
    clock: C,
    config: ProcessorConfig,
}

impl<S, F, B, C> Processor<S, F, B, C>
where
    S: SchedulerClient,
    F: CatalogFetcher,
    B: RecipeBuilders,
    C: Clock,
{
    pub fn new(
        scheduler: Arc<S>,
        fetcher: Arc<F>,
        builders: Arc<B>,
        metrics: Arc<dyn SyncMetrics>,
        clock: C,
        config: ProcessorConfig,
    ) -> Self {
        Self { scheduler, fetcher, builders, metrics, clock, config }
    }

    /// Tick until `shutdown` fires. The timer resets after each tick, so
    /// ticks never overlap.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!("processor started");
        loop {
            let started = self.clock.now();
            let outcome = self.sync(&shutdown).await;
            self.metrics.sync_duration(self.clock.now() - started);

            if outcome == SyncOutcome::Stopped {
                info!("processor stopped");
                return;
            }

            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("processor stopped");
                    return;
                }
                _ = self.clock.sleep(self.config.polling_interval) => {}
            }
        }
    }

    /// One reconciliation pass.
    pub async fn sync(&self, shutdown: &CancellationToken) -> SyncOutcome {
        let existing = match self.scheduler.lrps_by_domain(APP_DOMAIN).await {
            Ok(infos) => infos,
            Err(e) => {
                // Nothing to diff against; the next tick retries.
                warn!(error = %e, "failed to list scheduler state");
                return SyncOutcome::Completed;
            }
        };

        let existing: Arc<HashMap<String, SchedulingInfo>> = Arc::new(
            existing.into_iter().map(|info| (info.app_id.clone(), info)).collect(),
        );
        debug!(existing = existing.len(), "starting sync");

        let cancel = shutdown.child_token();

        let (fingerprints, fingerprint_errors) = self.fetcher.fetch_fingerprints(cancel.clone());
        let (fingerprint_errors, fingerprint_error_count) = counting_tee(fingerprint_errors);

        let differ = Differ::spawn(Arc::clone(&existing), fingerprints, cancel.clone());
        let Differ { missing, stale, deleted } = differ;

        let (missing_specs, missing_errors) =
            self.fetcher.fetch_app_specs(cancel.clone(), missing);
        let (stale_specs, stale_errors) = self.fetcher.fetch_app_specs(cancel.clone(), stale);

        let (create_errors_tx, create_errors_rx) = mpsc::channel(1);
        let (update_errors_tx, update_errors_rx) = mpsc::channel(1);

        tokio::spawn(run_create_pool(
            Arc::clone(&self.scheduler),
            Arc::clone(&self.builders),
            self.config.pool_size,
            missing_specs,
            create_errors_tx,
            cancel.clone(),
        ));
        tokio::spawn(run_update_pool(
            Arc::clone(&self.scheduler),
            Arc::clone(&self.builders),
            Arc::clone(&existing),
            self.config.pool_size,
            stale_specs,
            update_errors_tx,
            cancel.clone(),
        ));

        let mut errors = merge(vec![
            map_into::<_, SyncError>(fingerprint_errors),
            map_into::<_, SyncError>(missing_errors),
            map_into::<_, SyncError>(stale_errors),
            create_errors_rx,
            update_errors_rx,
        ]);

        // Drain the fan-in; its closure means every stage has finished.
        let mut bump_freshness = true;
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    cancel.cancel();
                    return SyncOutcome::Stopped;
                }
                error = errors.recv() => match error {
                    Some(e) => {
                        warn!(error = %e, "sync error");
                        bump_freshness = false;
                    }
                    None => break,
                }
            }
        }

        // The tee resolves once its stream closed; treat a dropped tee as
        // an incomplete fingerprint set.
        let fingerprint_error_count = fingerprint_error_count.await.unwrap_or(1);
        let fingerprints_complete = fingerprint_error_count == 0;

        if fingerprints_complete {
            match deleted.await {
                Ok(excess) => self.delete_excess(excess).await,
                Err(_) => warn!("differ exited without reporting excess workloads"),
            }
        } else {
            info!(
                errors = fingerprint_error_count,
                "fingerprint set incomplete; skipping deletions"
            );
        }

        if bump_freshness && fingerprints_complete {
            if let Err(e) = self.scheduler.upsert_domain(APP_DOMAIN, self.config.domain_ttl).await
            {
                warn!(error = %e, "failed to bump domain freshness");
            }
        }

        SyncOutcome::Completed
    }

    /// Deletions are independent of one another; failures are logged and
    /// the phase carries on.
    async fn delete_excess(&self, excess: Vec<String>) {
        for app_id in excess {
            debug!(app_id = %app_id, "removing excess workload");
            if let Err(e) = self.scheduler.remove_lrp(&app_id).await {
                warn!(app_id = %app_id, error = %e, "failed to remove workload");
            }
        }
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
