// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! shep-daemon: the `shepd` reconciler process.
//!
//! Wires the HTTP adapters, recipe builders, leader lock, and processor
//! together under a supervisor that routes termination signals.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod supervisor;

pub use config::{Config, ConfigError};
pub use supervisor::run_supervised;
