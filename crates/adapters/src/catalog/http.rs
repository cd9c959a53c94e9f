// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP implementation of the catalog bulk fetcher.

use super::{CatalogError, CatalogFetcher};
use serde::Deserialize;
use shep_core::{AppFingerprint, AppSpec};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const DEFAULT_BATCH_SIZE: usize = 500;

#[derive(Clone)]
pub struct HttpCatalogFetcher {
    base_url: String,
    username: String,
    password: String,
    batch_size: usize,
    client: reqwest::Client,
}

/// One page of the fingerprints endpoint. The token is opaque; its absence
/// marks the last page.
#[derive(Debug, Deserialize)]
struct FingerprintPage {
    #[serde(default)]
    fingerprints: Vec<AppFingerprint>,
    #[serde(default)]
    token: Option<serde_json::Value>,
}

impl HttpCatalogFetcher {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        batch_size: usize,
        client: reqwest::Client,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            batch_size: if batch_size == 0 { DEFAULT_BATCH_SIZE } else { batch_size },
            client,
        }
    }

    async fn fingerprint_page(
        &self,
        token: Option<&serde_json::Value>,
    ) -> Result<FingerprintPage, CatalogError> {
        let mut request = self
            .client
            .get(format!("{}/internal/bulk/apps", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .query(&[("format", "fingerprint")])
            .query(&[("batch_size", self.batch_size)]);

        if let Some(token) = token {
            request = request.query(&[("token", token.to_string())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }

    async fn specs_for(&self, batch: &[AppFingerprint]) -> Result<Vec<AppSpec>, CatalogError> {
        let guids: Vec<&str> = batch.iter().map(|f| f.app_id.as_str()).collect();
        let response = self
            .client
            .post(format!("{}/internal/bulk/apps", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .json(&guids)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }
}

impl CatalogFetcher for HttpCatalogFetcher {
    fn fetch_fingerprints(
        &self,
        cancel: CancellationToken,
    ) -> (mpsc::Receiver<Vec<AppFingerprint>>, mpsc::Receiver<CatalogError>) {
        let (batch_tx, batch_rx) = mpsc::channel(1);
        let (err_tx, err_rx) = mpsc::channel(1);
        let fetcher = self.clone();

        tokio::spawn(async move {
            let mut token: Option<serde_json::Value> = None;
            loop {
                let page = tokio::select! {
                    _ = cancel.cancelled() => return,
                    page = fetcher.fingerprint_page(token.as_ref()) => page,
                };

                let page = match page {
                    Ok(page) => page,
                    Err(e) => {
                        tokio::select! {
                            _ = cancel.cancelled() => {}
                            _ = err_tx.send(e) => {}
                        }
                        return;
                    }
                };

                let count = page.fingerprints.len();
                debug!(count, "fetched fingerprint page");

                if count > 0 {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        sent = batch_tx.send(page.fingerprints) => {
                            if sent.is_err() {
                                return;
                            }
                        }
                    }
                }

                // A short page is the last one.
                if count < fetcher.batch_size || page.token.is_none() {
                    return;
                }
                token = page.token;
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
        let fetcher = self.clone();

        tokio::spawn(async move {
            loop {
                let batch = tokio::select! {
                    _ = cancel.cancelled() => return,
                    batch = fingerprints.recv() => batch,
                };
                let Some(batch) = batch else {
                    return;
                };

                match fetcher.specs_for(&batch).await {
                    Ok(specs) => {
                        tokio::select! {
                            _ = cancel.cancelled() => return,
                            sent = spec_tx.send(specs) => {
                                if sent.is_err() {
                                    return;
                                }
                            }
                        }
                    }
                    // Per-batch failure; keep resolving the other batches.
                    Err(e) => {
                        tokio::select! {
                            _ = cancel.cancelled() => return,
                            _ = err_tx.send(e) => {}
                        }
                    }
                }
            }
        });

        (spec_rx, err_rx)
    }
}
