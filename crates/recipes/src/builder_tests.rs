// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use shep_core::HealthCheckType;
use yare::parameterized;

fn config() -> BuilderConfig {
    BuilderConfig {
        lifecycles: [
            ("buildpack/cflinuxfs3".to_string(), "buildpack/lifecycle.tgz".to_string()),
            ("docker".to_string(), "docker/lifecycle.tgz".to_string()),
        ]
        .into_iter()
        .collect(),
        file_server_url: "https://files.example.com".to_string(),
    }
}

fn spec(source_uri: Option<&str>, image_uri: Option<&str>) -> AppSpec {
    AppSpec {
        app_id: "app-1".to_string(),
        version_tag: "v1".to_string(),
        instance_count: 1,
        source_uri: source_uri.map(String::from),
        image_uri: image_uri.map(String::from),
        start_command: "start".to_string(),
        execution_metadata: String::new(),
        stack: "cflinuxfs3".to_string(),
        environment: Vec::new(),
        file_descriptors: 0,
        memory_mb: 256,
        disk_mb: 1024,
        routes: Vec::new(),
        allow_ssh: false,
        health_check: HealthCheckType::Port,
        health_check_timeout_secs: None,
        egress_rules: Vec::new(),
        log_guid: "log-1".to_string(),
    }
}

#[parameterized(
    zero = { 0, 0 },
    small = { 128, 1 },
    half = { 4096, 50 },
    max = { 8192, 100 },
    above_max = { 16384, 100 },
)]
fn cpu_weight_scales_with_memory(memory_mb: u32, expected: u32) {
    assert_eq!(cpu_weight(memory_mb), expected);
}

#[test]
fn lifecycle_url_joins_file_server_and_bundle_path() {
    let url = config().lifecycle_download_url("buildpack/cflinuxfs3").unwrap();
    assert_eq!(url, "https://files.example.com/v1/static/buildpack/lifecycle.tgz");
}

#[test]
fn lifecycle_url_fails_for_unknown_lifecycle() {
    let err = config().lifecycle_download_url("buildpack/windows2012").unwrap_err();
    assert_eq!(
        err,
        BuildError::NoLifecycleDefined { lifecycle: "buildpack/windows2012".to_string() }
    );
}

#[test]
fn launch_env_injects_platform_variables() {
    let env = launch_env(&[EnvVar::new("FOO", "bar")], 8080);
    assert!(env.contains(&EnvVar::new("FOO", "bar")));
    assert!(env.contains(&EnvVar::new("PORT", "8080")));
    assert!(env.contains(&EnvVar::new("VCAP_APP_PORT", "8080")));
    assert!(env.contains(&EnvVar::new("VCAP_APP_HOST", "0.0.0.0")));
}

#[test]
fn selection_prefers_docker_when_image_is_present() {
    let builders = LifecycleBuilders::new(config());

    let docker = builders.build(&spec(None, Some("docker:///library/app"))).unwrap();
    assert!(docker.root_fs.starts_with("docker://"));

    let buildpack = builders
        .build(&spec(Some("https://blobs.example.com/droplet"), None))
        .unwrap();
    assert!(buildpack.root_fs.starts_with("preloaded:"));
}

#[test]
fn selection_treats_empty_image_uri_as_buildpack() {
    let builders = LifecycleBuilders::new(config());
    let lrp = builders
        .build(&AppSpec {
            image_uri: Some(String::new()),
            ..spec(Some("https://blobs.example.com/droplet"), None)
        })
        .unwrap();
    assert!(lrp.root_fs.starts_with("preloaded:"));
}
