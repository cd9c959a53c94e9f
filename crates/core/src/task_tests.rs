// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    pending = { SchedulerTaskState::Pending, false },
    running = { SchedulerTaskState::Running, false },
    completed = { SchedulerTaskState::Completed, true },
    resolving = { SchedulerTaskState::Resolving, true },
)]
fn settled_states(state: SchedulerTaskState, settled: bool) {
    assert_eq!(SchedulerTask::new("task-1", state).is_settled(), settled);
}

#[test]
fn catalog_states_use_screaming_snake_case() {
    let task: CatalogTaskState =
        serde_json::from_str(r#"{"task_guid": "task-1", "state": "CANCELING"}"#).unwrap();
    assert_eq!(task.state, CatalogTaskStatus::Canceling);
}
