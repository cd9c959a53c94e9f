// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task variant of the diff: catalog task states against scheduler tasks.
//!
//! A task the catalog believes is running but the scheduler has never heard
//! of must be failed back in the catalog. A task the scheduler still tracks
//! that the catalog has dropped (or marked canceling) must be cancelled,
//! unless the scheduler is already done with it.

use shep_core::{CatalogTaskState, CatalogTaskStatus, SchedulerTask};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Output streams of one task diff run.
///
/// `to_cancel` resolves strictly after the catalog stream closes.
pub struct TaskDiffer {
    pub to_fail: mpsc::Receiver<Vec<CatalogTaskState>>,
    pub to_cancel: oneshot::Receiver<Vec<String>>,
}

impl TaskDiffer {
    /// Start diffing `catalog_tasks` against `scheduler_tasks` on a
    /// background task.
    pub fn spawn(
        scheduler_tasks: HashMap<String, SchedulerTask>,
        mut catalog_tasks: mpsc::Receiver<Vec<CatalogTaskState>>,
        cancel: CancellationToken,
    ) -> TaskDiffer {
        let (fail_tx, fail_rx) = mpsc::channel(1);
        let (cancel_tx, cancel_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut tasks_to_cancel = scheduler_tasks;

            loop {
                let batch = tokio::select! {
                    _ = cancel.cancelled() => return,
                    batch = catalog_tasks.recv() => batch,
                };
                let Some(batch) = batch else {
                    let mut ids: Vec<String> = tasks_to_cancel
                        .into_values()
                        .filter(|task| !task.is_settled())
                        .map(|task| task.task_id)
                        .collect();
                    ids.sort_unstable();
                    debug!(count = ids.len(), "task diff complete");
                    let _ = cancel_tx.send(ids);
                    return;
                };

                let mut fail_batch = Vec::new();
                for task in batch {
                    if tasks_to_cancel.contains_key(&task.task_id) {
                        // A canceling task stays in the cancel set even
                        // though the scheduler still knows it.
                        if task.state != CatalogTaskStatus::Canceling {
                            tasks_to_cancel.remove(&task.task_id);
                        }
                    } else if task.state == CatalogTaskStatus::Running {
                        debug!(task_id = %task.task_id, "task unknown to the scheduler");
                        fail_batch.push(task);
                    }
                }

                if !fail_batch.is_empty() {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        sent = fail_tx.send(fail_batch) => {
                            if sent.is_err() {
                                return;
                            }
                        }
                    }
                }
            }
        });

        TaskDiffer { to_fail: fail_rx, to_cancel: cancel_rx }
    }
}

#[cfg(test)]
#[path = "task_differ_tests.rs"]
mod tests;
