// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Catalog bulk-API fetcher: streams fingerprint batches and resolves them
//! to full app specs.
//!
//! The fetcher owns paging; retries are the catalog's responsibility. The
//! fingerprint stream is authoritative: any error on its error stream means
//! the set is incomplete and the caller must not delete anything this tick.

mod http;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{spec_for, FakeCatalogFetcher};

pub use http::HttpCatalogFetcher;

use shep_core::{AppFingerprint, AppSpec};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Errors from catalog bulk-API calls.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog responded with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("catalog transport error: {0}")]
    Transport(String),

    #[error("catalog response decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else {
            CatalogError::Transport(e.to_string())
        }
    }
}

/// Streaming access to the catalog's bulk API.
///
/// Both operations return `(results, errors)` receiver pairs backed by
/// spawned tasks. Tasks close both streams on completion, honor `cancel` at
/// every suspension point, and never block indefinitely on a send.
pub trait CatalogFetcher: Send + Sync + 'static {
    /// Stream the full fingerprint set in pages, one batch per page.
    fn fetch_fingerprints(
        &self,
        cancel: CancellationToken,
    ) -> (mpsc::Receiver<Vec<AppFingerprint>>, mpsc::Receiver<CatalogError>);

    /// Resolve fingerprint batches to full app specs, one output batch per
    /// input batch. Errors are per-batch; the results stream continues.
    fn fetch_app_specs(
        &self,
        cancel: CancellationToken,
        fingerprints: mpsc::Receiver<Vec<AppFingerprint>>,
    ) -> (mpsc::Receiver<Vec<AppSpec>>, mpsc::Receiver<CatalogError>);
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
