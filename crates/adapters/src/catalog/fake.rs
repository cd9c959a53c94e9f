// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake catalog fetcher for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CatalogError, CatalogFetcher};
use parking_lot::Mutex;
use shep_core::{AppFingerprint, AppSpec, HealthCheckType};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Fake catalog fetcher for testing
///
/// Streams programmed fingerprint batches and synthesizes app specs for
/// them; fingerprint and detail failures are programmable.
#[derive(Clone, Default)]
pub struct FakeCatalogFetcher {
    inner: Arc<Mutex<FakeCatalogState>>,
}

#[derive(Default)]
struct FakeCatalogState {
    batches: Vec<Vec<AppFingerprint>>,
    fingerprint_error: Option<String>,
    detail_error: Option<String>,
    spec_overrides: HashMap<String, AppSpec>,
    hold_open: bool,
}

/// Minimal valid buildpack spec for a fingerprint, the way the catalog
/// would describe it.
pub fn spec_for(fingerprint: &AppFingerprint) -> AppSpec {
    AppSpec {
        app_id: fingerprint.app_id.clone(),
        version_tag: fingerprint.version_tag.clone(),
        instance_count: 1,
        source_uri: Some(format!("https://blobs.example.com/droplets/{}", fingerprint.app_id)),
        image_uri: None,
        start_command: "start".to_string(),
        execution_metadata: String::new(),
        stack: "cflinuxfs3".to_string(),
        environment: Vec::new(),
        file_descriptors: 0,
        memory_mb: 256,
        disk_mb: 1024,
        routes: Vec::new(),
        allow_ssh: false,
        health_check: HealthCheckType::Port,
        health_check_timeout_secs: None,
        egress_rules: Vec::new(),
        log_guid: fingerprint.app_id.clone(),
    }
}

impl FakeCatalogFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program the fingerprint batches the next fetch streams.
    pub fn set_fingerprints(&self, batches: Vec<Vec<AppFingerprint>>) {
        self.inner.lock().batches = batches;
    }

    /// Emit an error on the fingerprint error stream after the batches.
    pub fn set_fingerprint_error(&self, message: &str) {
        self.inner.lock().fingerprint_error = Some(message.to_string());
    }

    /// Fail every detail batch instead of resolving it.
    pub fn set_detail_error(&self, message: &str) {
        self.inner.lock().detail_error = Some(message.to_string());
    }

    /// Replace the synthesized spec for one app.
    pub fn set_spec(&self, spec: AppSpec) {
        self.inner.lock().spec_overrides.insert(spec.app_id.clone(), spec);
    }

    /// Keep the fingerprint stream open after the batches until cancelled,
    /// as if more pages were still on the way.
    pub fn hold_fingerprints_open(&self) {
        self.inner.lock().hold_open = true;
    }
}

impl CatalogFetcher for FakeCatalogFetcher {
    fn fetch_fingerprints(
        &self,
        cancel: CancellationToken,
    ) -> (mpsc::Receiver<Vec<AppFingerprint>>, mpsc::Receiver<CatalogError>) {
        let (batches, fingerprint_error, hold_open) = {
            let inner = self.inner.lock();
            (inner.batches.clone(), inner.fingerprint_error.clone(), inner.hold_open)
        };

        let (batch_tx, batch_rx) = mpsc::channel(batches.len().max(1));
        let (err_tx, err_rx) = mpsc::channel(1);

        tokio::spawn(async move {
            for batch in batches {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    sent = batch_tx.send(batch) => {
                        if sent.is_err() {
                            return;
                        }
                    }
                }
            }
            if let Some(message) = fingerprint_error {
                let _ = err_tx.send(CatalogError::Transport(message)).await;
            }
            if hold_open {
                cancel.cancelled().await;
            }
        });

        (batch_rx, err_rx)
    }

    fn fetch_app_specs(
        &self,
        cancel: CancellationToken,
        mut fingerprints: mpsc::Receiver<Vec<AppFingerprint>>,
    ) -> (mpsc::Receiver<Vec<AppSpec>>, mpsc::Receiver<CatalogError>) {
        let (spec_tx, spec_rx) = mpsc::channel(1);
        let (err_tx, err_rx) = mpsc::channel(1);
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            loop {
                let batch = tokio::select! {
                    _ = cancel.cancelled() => return,
                    batch = fingerprints.recv() => batch,
                };
                let Some(batch) = batch else {
                    return;
                };

                let (detail_error, specs) = {
                    let inner = inner.lock();
                    let specs = batch
                        .iter()
                        .map(|f| {
                            inner
                                .spec_overrides
                                .get(&f.app_id)
                                .cloned()
                                .unwrap_or_else(|| spec_for(f))
                        })
                        .collect::<Vec<_>>();
                    (inner.detail_error.clone(), specs)
                };

                if let Some(message) = detail_error {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        _ = err_tx.send(CatalogError::Transport(message)) => {}
                    }
                    continue;
                }

                tokio::select! {
                    _ = cancel.cancelled() => return,
                    sent = spec_tx.send(specs) => {
                        if sent.is_err() {
                            return;
                        }
                    }
                }
            }
        });

        (spec_rx, err_rx)
    }
}
