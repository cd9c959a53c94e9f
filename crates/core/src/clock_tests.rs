// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[test]
fn fake_clock_advance_moves_now_and_epoch() {
    let clock = FakeClock::new();
    let start = clock.now();
    clock.set_epoch_ms(5_000);

    clock.advance(Duration::from_secs(2));

    assert_eq!(clock.now(), start + Duration::from_secs(2));
    assert_eq!(clock.epoch_ms(), 7_000);
}

#[tokio::test]
async fn fake_sleep_completes_once_advanced_past_deadline() {
    let clock = FakeClock::new();
    let sleeper = {
        let clock = clock.clone();
        tokio::spawn(async move { clock.sleep(Duration::from_secs(30)).await })
    };

    // Let the sleeper register its deadline before advancing.
    tokio::task::yield_now().await;

    // Not enough; the sleeper must still be pending.
    clock.advance(Duration::from_secs(10));
    tokio::task::yield_now().await;
    assert!(!sleeper.is_finished());

    clock.advance(Duration::from_secs(25));
    sleeper.await.unwrap();
}

#[tokio::test]
async fn fake_sleep_returns_immediately_for_zero_duration() {
    let clock = FakeClock::new();
    clock.sleep(Duration::ZERO).await;
}
