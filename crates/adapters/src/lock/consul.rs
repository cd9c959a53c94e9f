// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Consul-backed lock store using the session + KV HTTP API.

use super::{LockError, LockStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const LOCK_KEY: &str = "shepherd/reconciler_lock";

pub struct ConsulLockStore {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CreatedSession {
    #[serde(rename = "ID")]
    id: String,
}

#[derive(Debug, Serialize)]
struct LockValue<'a> {
    owner_id: &'a str,
}

impl ConsulLockStore {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url: String = base_url.into();
        Self { base_url: base_url.trim_end_matches('/').to_string(), client }
    }
}

impl From<reqwest::Error> for LockError {
    fn from(e: reqwest::Error) -> Self {
        LockError::Store(e.to_string())
    }
}

#[async_trait]
impl LockStore for ConsulLockStore {
    async fn create_session(&self, ttl: Duration) -> Result<String, LockError> {
        let response = self
            .client
            .put(format!("{}/v1/session/create", self.base_url))
            .json(&json!({
                "Name": "shepherd",
                "TTL": format!("{}s", ttl.as_secs()),
                "Behavior": "delete",
                "LockDelay": "0s",
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LockError::Store(format!(
                "session create returned status {}",
                response.status()
            )));
        }
        let session: CreatedSession = response.json().await?;
        Ok(session.id)
    }

    async fn acquire(&self, session: &str, owner_id: &str) -> Result<bool, LockError> {
        let response = self
            .client
            .put(format!("{}/v1/kv/{LOCK_KEY}", self.base_url))
            .query(&[("acquire", session)])
            .json(&LockValue { owner_id })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LockError::Store(format!(
                "lock acquire returned status {}",
                response.status()
            )));
        }
        let acquired: bool = response.json().await?;
        Ok(acquired)
    }

    async fn renew(&self, session: &str) -> Result<(), LockError> {
        let response = self
            .client
            .put(format!("{}/v1/session/renew/{session}", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LockError::Store(format!(
                "session renew returned status {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn release(&self, session: &str) -> Result<(), LockError> {
        let release = self
            .client
            .put(format!("{}/v1/kv/{LOCK_KEY}", self.base_url))
            .query(&[("release", session)])
            .send()
            .await?;
        if !release.status().is_success() {
            return Err(LockError::Store(format!(
                "lock release returned status {}",
                release.status()
            )));
        }

        let destroy = self
            .client
            .put(format!("{}/v1/session/destroy/{session}", self.base_url))
            .send()
            .await?;
        if !destroy.status().is_success() {
            return Err(LockError::Store(format!(
                "session destroy returned status {}",
                destroy.status()
            )));
        }
        Ok(())
    }
}
