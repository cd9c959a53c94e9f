// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! shep-engine: the bulk reconciliation pipeline.
//!
//! Once per tick the processor fetches the scheduler's view of the app
//! domain, streams the catalog's fingerprints through the differ, fans the
//! missing and stale sets out to bounded worker pools, fans their errors
//! back in, and decides whether it is safe to delete excess workloads and
//! renew the freshness lease.

pub mod differ;
pub mod error;
pub mod fanin;
pub mod metrics;
pub mod pools;
pub mod processor;
pub mod task_differ;
pub mod tee;

pub use differ::Differ;
pub use error::SyncError;
pub use fanin::{map_into, merge};
pub use metrics::{SyncMetrics, TracingMetrics, SYNC_DURATION_METRIC};
pub use processor::{Processor, ProcessorConfig, SyncOutcome};
pub use task_differ::TaskDiffer;
pub use tee::counting_tee;
