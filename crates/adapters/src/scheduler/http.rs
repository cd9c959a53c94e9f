// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP implementation of the scheduler client.

use super::{classify_failure, ApiErrorBody, SchedulerClient, SchedulerError};
use async_trait::async_trait;
use shep_core::{DesiredLrp, DesiredLrpUpdate, SchedulingInfo};
use std::time::Duration;

pub struct HttpSchedulerClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSchedulerClient {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into();
        Self { base_url: base_url.trim_end_matches('/').to_string(), client }
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, SchedulerError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: ApiErrorBody = response.json().await.unwrap_or(ApiErrorBody {
            error: String::new(),
            message: format!("status {status}"),
        });
        Err(classify_failure(status.as_u16(), body))
    }
}

impl From<reqwest::Error> for SchedulerError {
    fn from(e: reqwest::Error) -> Self {
        SchedulerError::Transport(e.to_string())
    }
}

#[async_trait]
impl SchedulerClient for HttpSchedulerClient {
    async fn lrps_by_domain(&self, domain: &str) -> Result<Vec<SchedulingInfo>, SchedulerError> {
        let response = self
            .client
            .get(format!("{}/v1/desired_lrps", self.base_url))
            .query(&[("domain", domain)])
            .send()
            .await?;
        let infos = self.check(response).await?.json().await?;
        Ok(infos)
    }

    async fn desire_lrp(&self, lrp: &DesiredLrp) -> Result<(), SchedulerError> {
        let response = self
            .client
            .post(format!("{}/v1/desired_lrps", self.base_url))
            .json(lrp)
            .send()
            .await?;
        self.check(response).await?;
        Ok(())
    }

    async fn update_lrp(
        &self,
        app_id: &str,
        update: &DesiredLrpUpdate,
    ) -> Result<(), SchedulerError> {
        let response = self
            .client
            .put(format!("{}/v1/desired_lrps/{app_id}", self.base_url))
            .json(update)
            .send()
            .await?;
        self.check(response).await?;
        Ok(())
    }

    async fn remove_lrp(&self, app_id: &str) -> Result<(), SchedulerError> {
        let response = self
            .client
            .delete(format!("{}/v1/desired_lrps/{app_id}", self.base_url))
            .send()
            .await?;
        self.check(response).await?;
        Ok(())
    }

    async fn upsert_domain(&self, domain: &str, ttl: Duration) -> Result<(), SchedulerError> {
        let response = self
            .client
            .put(format!("{}/v1/domains/{domain}", self.base_url))
            .query(&[("ttl", ttl.as_secs())])
            .send()
            .await?;
        self.check(response).await?;
        Ok(())
    }
}
