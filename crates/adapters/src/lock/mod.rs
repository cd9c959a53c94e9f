// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Leader lock: an exclusive, heartbeated lease in a coordination store.
//!
//! Exactly one replica holds the lock at a time. Acquisition blocks until
//! the lease is ours; losing it after acquisition is fatal to the process.

mod consul;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLockStore, LockCall};

pub use consul::ConsulLockStore;

use async_trait::async_trait;
use shep_core::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors from lock operations.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("coordination store error: {0}")]
    Store(String),

    /// The lease expired or was stolen after we held it.
    #[error("leader lock lost")]
    Lost,
}

/// TTL-lease operations a coordination store must provide.
#[async_trait]
pub trait LockStore: Send + Sync + 'static {
    /// Create a lease with the given TTL; returns its id.
    async fn create_session(&self, ttl: Duration) -> Result<String, LockError>;

    /// Try to take the lock under `session`, storing `owner_id` as the
    /// value. `false` means another owner holds it.
    async fn acquire(&self, session: &str, owner_id: &str) -> Result<bool, LockError>;

    /// Renew the lease. An error means the lease is gone.
    async fn renew(&self, session: &str) -> Result<(), LockError>;

    /// Release the lock and discard the lease.
    async fn release(&self, session: &str) -> Result<(), LockError>;
}

/// Lease timing configuration.
#[derive(Debug, Clone)]
pub struct LockConfig {
    pub ttl: Duration,
    /// Pause between failed acquisition attempts.
    pub retry_interval: Duration,
}

/// Holds the leader lock for the lifetime of the process.
///
/// `run` resolves `ready` once the lock is held, renews it at half the TTL,
/// and returns `Err(LockError::Lost)` if a renewal fails. On shutdown the
/// lease is released so the next replica does not wait out the TTL.
pub struct LeaderLock<S, C> {
    store: Arc<S>,
    clock: C,
    config: LockConfig,
    /// Random unique identity stored as the lock value to detect theft.
    owner_id: String,
}

impl<S: LockStore, C: Clock> LeaderLock<S, C> {
    pub fn new(store: Arc<S>, clock: C, config: LockConfig, owner_id: impl Into<String>) -> Self {
        Self { store, clock, config, owner_id: owner_id.into() }
    }

    pub async fn run(
        &self,
        shutdown: CancellationToken,
        ready: oneshot::Sender<()>,
    ) -> Result<(), LockError> {
        let session = match self.acquire(&shutdown).await {
            Some(session) => session,
            None => return Ok(()),
        };

        info!(owner_id = %self.owner_id, "leader lock acquired");
        let _ = ready.send(());

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    if let Err(e) = self.store.release(&session).await {
                        warn!(error = %e, "failed to release leader lock on shutdown");
                    }
                    return Ok(());
                }
                _ = self.clock.sleep(self.config.ttl / 2) => {
                    if let Err(e) = self.store.renew(&session).await {
                        warn!(error = %e, "leader lock renewal failed");
                        return Err(LockError::Lost);
                    }
                }
            }
        }
    }

    /// Block until the lock is ours; `None` means shutdown arrived first.
    async fn acquire(&self, shutdown: &CancellationToken) -> Option<String> {
        let mut session: Option<String> = None;

        loop {
            if shutdown.is_cancelled() {
                return None;
            }

            match self.try_acquire(session.take()).await {
                Ok((id, true)) => return Some(id),
                Ok((id, false)) => {
                    session = Some(id);
                }
                Err(e) => {
                    warn!(error = %e, "leader lock acquisition attempt failed");
                }
            }

            tokio::select! {
                _ = shutdown.cancelled() => return None,
                _ = self.clock.sleep(self.config.retry_interval) => {}
            }
        }
    }

    async fn try_acquire(&self, session: Option<String>) -> Result<(String, bool), LockError> {
        let session = match session {
            Some(session) => session,
            None => self.store.create_session(self.config.ttl).await?,
        };
        let held = self.store.acquire(&session, &self.owner_id).await?;
        Ok((session, held))
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
