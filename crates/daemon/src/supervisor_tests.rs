// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use shep_adapters::{FakeCatalogFetcher, FakeLockStore, FakeSchedulerClient, LockConfig};
use shep_core::FakeClock;
use shep_engine::{ProcessorConfig, TracingMetrics};
use shep_recipes::FakeRecipeBuilders;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    store: Arc<FakeLockStore>,
    scheduler: FakeSchedulerClient,
    clock: FakeClock,
    shutdown: CancellationToken,
    supervisor: tokio::task::JoinHandle<i32>,
}

fn start(store: Arc<FakeLockStore>) -> Harness {
    let scheduler = FakeSchedulerClient::new();
    let clock = FakeClock::new();
    let shutdown = CancellationToken::new();

    let lock = LeaderLock::new(
        Arc::clone(&store),
        clock.clone(),
        LockConfig {
            ttl: Duration::from_secs(15),
            retry_interval: Duration::from_secs(5),
        },
        "owner-1",
    );
    let processor = Processor::new(
        Arc::new(scheduler.clone()),
        Arc::new(FakeCatalogFetcher::new()),
        Arc::new(FakeRecipeBuilders::new()),
        Arc::new(TracingMetrics),
        clock.clone(),
        ProcessorConfig::default(),
    );

    let supervisor = {
        let shutdown = shutdown.clone();
        tokio::spawn(run_supervised(lock, processor, shutdown))
    };

    Harness { store, scheduler, clock, shutdown, supervisor }
}

async fn settle() {
    for _ in 0..100 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn graceful_shutdown_exits_clean() {
    let h = start(Arc::new(FakeLockStore::new()));

    settle().await;
    h.shutdown.cancel();

    assert_eq!(h.supervisor.await.unwrap(), EXIT_CLEAN);
    assert!(h.store.released());
}

#[tokio::test]
async fn the_processor_waits_for_the_lock() {
    let store = Arc::new(FakeLockStore::new());
    store.set_acquire_results(vec![false, true]);
    let h = start(store);

    settle().await;
    assert!(h.scheduler.calls().is_empty());

    h.clock.advance(Duration::from_secs(5));
    settle().await;
    assert!(!h.scheduler.calls().is_empty());

    h.shutdown.cancel();
    assert_eq!(h.supervisor.await.unwrap(), EXIT_CLEAN);
}

#[tokio::test]
async fn lock_loss_is_fatal() {
    let store = Arc::new(FakeLockStore::new());
    store.fail_renewals();
    let h = start(store);

    settle().await;
    h.clock.advance(Duration::from_secs(8));

    assert_eq!(h.supervisor.await.unwrap(), EXIT_FATAL);
}

#[tokio::test]
async fn shutdown_while_waiting_for_the_lock_exits_clean() {
    let store = Arc::new(FakeLockStore::new());
    store.set_acquire_results(vec![false, false, false, false]);
    let h = start(store);

    settle().await;
    h.shutdown.cancel();

    assert_eq!(h.supervisor.await.unwrap(), EXIT_CLEAN);
}
