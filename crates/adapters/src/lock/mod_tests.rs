// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use shep_core::FakeClock;

fn lock(store: &Arc<FakeLockStore>, clock: &FakeClock) -> LeaderLock<FakeLockStore, FakeClock> {
    LeaderLock::new(
        Arc::clone(store),
        clock.clone(),
        LockConfig {
            ttl: Duration::from_secs(15),
            retry_interval: Duration::from_secs(5),
        },
        "owner-1",
    )
}

/// Yield enough times for spawned tasks to run between clock advances.
async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn acquires_and_signals_ready() {
    let store = Arc::new(FakeLockStore::new());
    let clock = FakeClock::new();
    let shutdown = CancellationToken::new();
    let (ready_tx, ready_rx) = oneshot::channel();

    let runner = {
        let store = Arc::clone(&store);
        let clock = clock.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { lock(&store, &clock).run(shutdown, ready_tx).await })
    };

    ready_rx.await.unwrap();
    assert!(store
        .calls()
        .iter()
        .any(|c| matches!(c, LockCall::Acquire { owner_id, .. } if owner_id == "owner-1")));

    shutdown.cancel();
    runner.await.unwrap().unwrap();
    assert!(store.released());
}

#[tokio::test]
async fn retries_until_the_lock_is_free() {
    let store = Arc::new(FakeLockStore::new());
    store.set_acquire_results(vec![false, false, true]);
    let clock = FakeClock::new();
    let shutdown = CancellationToken::new();
    let (ready_tx, mut ready_rx) = oneshot::channel();

    let _runner = {
        let store = Arc::clone(&store);
        let clock = clock.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { lock(&store, &clock).run(shutdown, ready_tx).await })
    };

    settle().await;
    assert!(ready_rx.try_recv().is_err());

    clock.advance(Duration::from_secs(5));
    settle().await;
    clock.advance(Duration::from_secs(5));
    settle().await;

    ready_rx.await.unwrap();
    let acquire_attempts = store
        .calls()
        .iter()
        .filter(|c| matches!(c, LockCall::Acquire { .. }))
        .count();
    assert_eq!(acquire_attempts, 3);
}

#[tokio::test]
async fn renews_at_half_the_ttl() {
    let store = Arc::new(FakeLockStore::new());
    let clock = FakeClock::new();
    let shutdown = CancellationToken::new();
    let (ready_tx, ready_rx) = oneshot::channel();

    let _runner = {
        let store = Arc::clone(&store);
        let clock = clock.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { lock(&store, &clock).run(shutdown, ready_tx).await })
    };

    ready_rx.await.unwrap();
    settle().await;

    clock.advance(Duration::from_secs(8));
    settle().await;
    assert_eq!(store.renew_count(), 1);

    clock.advance(Duration::from_secs(8));
    settle().await;
    assert_eq!(store.renew_count(), 2);
}

#[tokio::test]
async fn failed_renewal_is_fatal() {
    let store = Arc::new(FakeLockStore::new());
    store.fail_renewals();
    let clock = FakeClock::new();
    let shutdown = CancellationToken::new();
    let (ready_tx, ready_rx) = oneshot::channel();

    let runner = {
        let store = Arc::clone(&store);
        let clock = clock.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { lock(&store, &clock).run(shutdown, ready_tx).await })
    };

    ready_rx.await.unwrap();
    settle().await;
    clock.advance(Duration::from_secs(8));

    let result = runner.await.unwrap();
    assert!(matches!(result, Err(LockError::Lost)));
}

#[tokio::test]
async fn shutdown_during_acquisition_exits_cleanly() {
    let store = Arc::new(FakeLockStore::new());
    store.set_acquire_results(vec![false, false, false, false]);
    let clock = FakeClock::new();
    let shutdown = CancellationToken::new();
    let (ready_tx, _ready_rx) = oneshot::channel();

    let runner = {
        let store = Arc::clone(&store);
        let clock = clock.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move { lock(&store, &clock).run(shutdown, ready_tx).await })
    };

    settle().await;
    shutdown.cancel();
    runner.await.unwrap().unwrap();
}
