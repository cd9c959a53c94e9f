// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn forwards_items_and_reports_the_count() {
    let (tx, rx) = mpsc::channel(4);
    tx.send("a").await.unwrap();
    tx.send("b").await.unwrap();
    tx.send("c").await.unwrap();
    drop(tx);

    let (mut forwarded, count) = counting_tee(rx);

    let mut seen = Vec::new();
    while let Some(item) = forwarded.recv().await {
        seen.push(item);
    }
    assert_eq!(seen, vec!["a", "b", "c"]);
    assert_eq!(count.await.unwrap(), 3);
}

#[tokio::test]
async fn empty_stream_counts_zero() {
    let (tx, rx) = mpsc::channel::<&str>(1);
    drop(tx);

    let (mut forwarded, count) = counting_tee(rx);
    assert!(forwarded.recv().await.is_none());
    assert_eq!(count.await.unwrap(), 0);
}

#[tokio::test]
async fn counts_the_rest_when_the_forward_side_is_dropped() {
    let (tx, rx) = mpsc::channel(8);
    for i in 0..5 {
        tx.send(i).await.unwrap();
    }
    drop(tx);

    let (forwarded, count) = counting_tee(rx);
    drop(forwarded);
    assert_eq!(count.await.unwrap(), 5);
}
