// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! shep-adapters: clients for the reconciler's external collaborators.
//!
//! Three seams, each a trait with an HTTP implementation and a recording
//! fake: the scheduler (workload writes + freshness lease), the catalog's
//! bulk API (fingerprint and detail streams), and the coordination store
//! backing the leader lock.

pub mod catalog;
pub mod http;
pub mod lock;
pub mod scheduler;

pub use catalog::{CatalogError, CatalogFetcher, HttpCatalogFetcher};
#[cfg(any(test, feature = "test-support"))]
pub use catalog::{spec_for, FakeCatalogFetcher};
pub use http::HttpConfig;
#[cfg(any(test, feature = "test-support"))]
pub use lock::{FakeLockStore, LockCall};
pub use lock::{ConsulLockStore, LeaderLock, LockConfig, LockError, LockStore};
#[cfg(any(test, feature = "test-support"))]
pub use scheduler::{FakeSchedulerClient, SchedulerCall};
pub use scheduler::{HttpSchedulerClient, SchedulerClient, SchedulerError};
