// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task state types for the task diff variant.

use serde::{Deserialize, Serialize};

/// A task as the catalog's bulk API reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTaskState {
    #[serde(rename = "task_guid")]
    pub task_id: String,
    pub state: CatalogTaskStatus,
}

impl CatalogTaskState {
    pub fn new(task_id: impl Into<String>, state: CatalogTaskStatus) -> Self {
        Self { task_id: task_id.into(), state }
    }
}

/// Catalog-side task lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogTaskStatus {
    Pending,
    Running,
    Canceling,
    Succeeded,
    Failed,
}

/// A task as the scheduler knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerTask {
    #[serde(rename = "task_guid")]
    pub task_id: String,
    pub state: SchedulerTaskState,
}

impl SchedulerTask {
    pub fn new(task_id: impl Into<String>, state: SchedulerTaskState) -> Self {
        Self { task_id: task_id.into(), state }
    }
}

/// Scheduler-side task lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerTaskState {
    Pending,
    Running,
    Completed,
    Resolving,
}

impl SchedulerTask {
    /// Whether the scheduler is already done with this task; cancellation is
    /// pointless past this point.
    pub fn is_settled(&self) -> bool {
        matches!(self.state, SchedulerTaskState::Completed | SchedulerTaskState::Resolving)
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
