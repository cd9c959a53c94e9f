// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classifies the catalog's fingerprints against the scheduler's state.
//!
//! Every fingerprint lands in exactly one of four classes: *missing* (in
//! the catalog, not the scheduler), *stale* (in both, tags differ),
//! *unchanged* (in both, tags equal), or *excess* (in the scheduler only).
//! Missing and stale flow out batch-preserving so downstream fan-out stays
//! paced; the excess set is emitted exactly once, after the last batch.

use shep_core::{AppFingerprint, SchedulingInfo};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Output streams of one diff run.
///
/// `deleted` resolves strictly after every input batch has been processed;
/// it never resolves if the diff is cancelled mid-stream.
pub struct Differ {
    pub missing: mpsc::Receiver<Vec<AppFingerprint>>,
    pub stale: mpsc::Receiver<Vec<AppFingerprint>>,
    pub deleted: oneshot::Receiver<Vec<String>>,
}

impl Differ {
    /// Start diffing `fingerprints` against `existing` on a background task.
    pub fn spawn(
        existing: Arc<HashMap<String, SchedulingInfo>>,
        mut fingerprints: mpsc::Receiver<Vec<AppFingerprint>>,
        cancel: CancellationToken,
    ) -> Differ {
        let (missing_tx, missing_rx) = mpsc::channel(1);
        let (stale_tx, stale_rx) = mpsc::channel(1);
        let (deleted_tx, deleted_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut to_delete: HashSet<String> = existing.keys().cloned().collect();

            loop {
                let batch = tokio::select! {
                    _ = cancel.cancelled() => return,
                    batch = fingerprints.recv() => batch,
                };
                let Some(batch) = batch else {
                    let mut excess: Vec<String> = to_delete.into_iter().collect();
                    excess.sort_unstable();
                    debug!(count = excess.len(), "diff complete");
                    let _ = deleted_tx.send(excess);
                    return;
                };

                let mut missing_batch = Vec::new();
                let mut stale_batch = Vec::new();

                for fingerprint in batch {
                    match existing.get(&fingerprint.app_id) {
                        None => missing_batch.push(fingerprint),
                        Some(info) => {
                            to_delete.remove(&fingerprint.app_id);
                            if info.version_tag != fingerprint.version_tag {
                                stale_batch.push(fingerprint);
                            }
                        }
                    }
                }

                if !missing_batch.is_empty() {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        sent = missing_tx.send(missing_batch) => {
                            if sent.is_err() {
                                return;
                            }
                        }
                    }
                }
                if !stale_batch.is_empty() {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        sent = stale_tx.send(stale_batch) => {
                            if sent.is_err() {
                                return;
                            }
                        }
                    }
                }
            }
        });

        Differ { missing: missing_rx, stale: stale_rx, deleted: deleted_rx }
    }
}

#[cfg(test)]
#[path = "differ_tests.rs"]
mod tests;
