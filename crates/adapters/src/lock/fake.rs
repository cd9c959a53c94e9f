// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake lock store for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{LockError, LockStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Recorded call to FakeLockStore
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockCall {
    CreateSession { ttl: Duration },
    Acquire { session: String, owner_id: String },
    Renew { session: String },
    Release { session: String },
}

/// Fake lock store for testing
///
/// Acquisition outcomes are programmable per attempt; renewals succeed
/// until `fail_renewals` is set.
#[derive(Clone, Default)]
pub struct FakeLockStore {
    inner: Arc<Mutex<FakeLockState>>,
}

#[derive(Default)]
struct FakeLockState {
    calls: Vec<LockCall>,
    sessions_created: u64,
    acquire_results: VecDeque<bool>,
    fail_renewals: bool,
}

impl FakeLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program outcomes for successive acquire attempts. Once the queue is
    /// exhausted, acquires succeed.
    pub fn set_acquire_results(&self, results: Vec<bool>) {
        self.inner.lock().acquire_results = results.into();
    }

    /// Make every renewal fail from now on.
    pub fn fail_renewals(&self) {
        self.inner.lock().fail_renewals = true;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<LockCall> {
        self.inner.lock().calls.clone()
    }

    /// Number of renew calls seen so far
    pub fn renew_count(&self) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, LockCall::Renew { .. }))
            .count()
    }

    /// Whether the lock was released
    pub fn released(&self) -> bool {
        self.inner.lock().calls.iter().any(|c| matches!(c, LockCall::Release { .. }))
    }
}

#[async_trait]
impl LockStore for FakeLockStore {
    async fn create_session(&self, ttl: Duration) -> Result<String, LockError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LockCall::CreateSession { ttl });
        inner.sessions_created += 1;
        Ok(format!("session-{}", inner.sessions_created))
    }

    async fn acquire(&self, session: &str, owner_id: &str) -> Result<bool, LockError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LockCall::Acquire {
            session: session.to_string(),
            owner_id: owner_id.to_string(),
        });
        Ok(inner.acquire_results.pop_front().unwrap_or(true))
    }

    async fn renew(&self, session: &str) -> Result<(), LockError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LockCall::Renew { session: session.to_string() });
        if inner.fail_renewals {
            Err(LockError::Store("session expired".to_string()))
        } else {
            Ok(())
        }
    }

    async fn release(&self, session: &str) -> Result<(), LockError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LockCall::Release { session: session.to_string() });
        Ok(())
    }
}
