// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error fan-in: merge many receivers into one stream.

use tokio::sync::mpsc;

/// Merge every source into one receiver.
///
/// The merged stream closes when all sources have closed. Items from
/// different sources interleave in arrival order; each source stays
/// internally ordered.
pub fn merge<T: Send + 'static>(sources: Vec<mpsc::Receiver<T>>) -> mpsc::Receiver<T> {
    let (tx, rx) = mpsc::channel(1);
    for mut source in sources {
        let tx = tx.clone();
        tokio::spawn(async move {
            while let Some(item) = source.recv().await {
                if tx.send(item).await.is_err() {
                    return;
                }
            }
        });
    }
    rx
}

/// Convert a receiver of `T` into a receiver of `U` as items flow past.
pub fn map_into<T, U>(mut source: mpsc::Receiver<T>) -> mpsc::Receiver<U>
where
    T: Send + 'static,
    U: From<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        while let Some(item) = source.recv().await {
            if tx.send(U::from(item)).await.is_err() {
                return;
            }
        }
    });
    rx
}

#[cfg(test)]
#[path = "fanin_tests.rs"]
mod tests;
