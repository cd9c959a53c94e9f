// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered supervision of the leader lock and the processor.
//!
//! The processor only starts once the lock is held. Loss of the lock is
//! fatal: the in-flight pipeline is cancelled and the process exits
//! non-zero so the next replica can take over. A termination signal shuts
//! both down and exits zero.

use shep_adapters::{CatalogFetcher, LeaderLock, LockStore, SchedulerClient};
use shep_core::Clock;
use shep_engine::Processor;
use shep_recipes::RecipeBuilders;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_FATAL: i32 = 1;

/// Run the lock-holder and the reconciler as an ordered group; returns the
/// process exit code.
pub async fn run_supervised<L, S, F, B, C>(
    lock: LeaderLock<L, C>,
    processor: Processor<S, F, B, C>,
    shutdown: CancellationToken,
) -> i32
where
    L: LockStore,
    S: SchedulerClient,
    F: CatalogFetcher,
    B: RecipeBuilders,
    C: Clock,
{
    let (ready_tx, ready_rx) = oneshot::channel();

    let mut lock_task = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { lock.run(shutdown, ready_tx).await })
    };

    info!("waiting for leader lock");
    tokio::select! {
        ready = ready_rx => {
            if ready.is_err() {
                // The sender was dropped: the lock runner is exiting
                // without ever holding the lock.
                return exit_code_for(lock_task.await);
            }
        }
        result = &mut lock_task => {
            // The lock runner exited before signalling readiness: either a
            // shutdown during acquisition or a store failure.
            return exit_code_for(result);
        }
    }

    info!("started");
    let mut processor_task = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { processor.run(shutdown).await })
    };

    tokio::select! {
        result = &mut lock_task => {
            match result {
                Ok(Ok(())) => {
                    // Lock released on shutdown; let the processor finish.
                    let _ = processor_task.await;
                    EXIT_CLEAN
                }
                Ok(Err(e)) => {
                    error!(error = %e, "leader lock lost; terminating");
                    shutdown.cancel();
                    let _ = processor_task.await;
                    EXIT_FATAL
                }
                Err(e) => {
                    error!(error = %e, "leader lock task panicked");
                    shutdown.cancel();
                    let _ = processor_task.await;
                    EXIT_FATAL
                }
            }
        }
        result = &mut processor_task => {
            // The processor only returns on shutdown.
            if let Err(e) = result {
                error!(error = %e, "processor task panicked");
                shutdown.cancel();
                let _ = lock_task.await;
                return EXIT_FATAL;
            }
            let _ = lock_task.await;
            EXIT_CLEAN
        }
    }
}

fn exit_code_for(result: Result<Result<(), shep_adapters::LockError>, tokio::task::JoinError>) -> i32 {
    match result {
        Ok(Ok(())) => EXIT_CLEAN,
        Ok(Err(e)) => {
            error!(error = %e, "leader lock failed");
            EXIT_FATAL
        }
        Err(e) => {
            error!(error = %e, "leader lock task panicked");
            EXIT_FATAL
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
