// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counting tee: a transparent forwarder with a post-close count output.

use tokio::sync::{mpsc, oneshot};

/// Forward every item from `source`, and resolve the returned oneshot with
/// how many items flowed past once the source closes.
///
/// If the forwarded side is dropped, the remaining items are still drained
/// and counted so the count always reflects the full stream.
pub fn counting_tee<T: Send + 'static>(
    mut source: mpsc::Receiver<T>,
) -> (mpsc::Receiver<T>, oneshot::Receiver<usize>) {
    let (tx, out_rx) = mpsc::channel(1);
    let (count_tx, count_rx) = oneshot::channel();

    tokio::spawn(async move {
        let mut count = 0usize;
        let mut forwarding = true;
        while let Some(item) = source.recv().await {
            count += 1;
            if forwarding && tx.send(item).await.is_err() {
                forwarding = false;
            }
        }
        let _ = count_tx.send(count);
    });

    (out_rx, count_rx)
}

#[cfg(test)]
#[path = "tee_tests.rs"]
mod tests;
