// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::expect_used))]

//! Workspace-level specs driving the shepd binary.
//!
//! Everything that needs live collaborators (scheduler, catalog, consul) is
//! covered by crate-level tests against fakes; these specs only pin down
//! the binary's flag handling and startup failure modes.

use assert_cmd::Command;

fn shepd() -> Command {
    Command::cargo_bin("shepd").expect("shepd binary should be built")
}

fn required_flags(cmd: &mut Command) -> &mut Command {
    cmd.args([
        "--diegoAPIURL",
        "http://127.0.0.1:1",
        "--consulCluster",
        "http://127.0.0.1:1",
        "--ccBaseURL",
        "http://127.0.0.1:1",
        "--ccUsername",
        "bulk",
        "--ccPassword",
        "secret",
    ])
}

#[test]
fn help_exits_zero() {
    shepd().arg("--help").assert().success();
}

#[test]
fn missing_required_flags_is_a_usage_error() {
    shepd().assert().failure().code(2);
}

#[test]
fn invalid_lifecycle_mapping_is_fatal() {
    required_flags(&mut shepd())
        .args(["--lifecycles", "not-json"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn invalid_duration_flag_is_a_usage_error() {
    required_flags(&mut shepd())
        .args(["--pollingInterval", "10fortnights"])
        .assert()
        .failure()
        .code(2);
}
