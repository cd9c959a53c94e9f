// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::builder::BuilderConfig;
use shep_core::{Action, AppSpec, EnvVar, HttpRoute};

fn config() -> BuilderConfig {
    BuilderConfig {
        lifecycles: [("buildpack/cflinuxfs3".to_string(), "lifecycle.tgz".to_string())]
            .into_iter()
            .collect(),
        file_server_url: "https://files.example.com".to_string(),
    }
}

fn valid_spec() -> AppSpec {
    AppSpec {
        app_id: "app-1".to_string(),
        version_tag: "v1".to_string(),
        instance_count: 3,
        source_uri: Some("https://blobs.example.com/droplets/app-1".to_string()),
        image_uri: None,
        start_command: "bundle exec rackup".to_string(),
        execution_metadata: "{}".to_string(),
        stack: "cflinuxfs3".to_string(),
        environment: vec![EnvVar::new("RAILS_ENV", "production")],
        file_descriptors: 16384,
        memory_mb: 512,
        disk_mb: 2048,
        routes: vec![HttpRoute { hostname: "app.example.com".to_string(), port: None }],
        allow_ssh: false,
        health_check: HealthCheckType::Port,
        health_check_timeout_secs: Some(60),
        egress_rules: Vec::new(),
        log_guid: "log-1".to_string(),
    }
}

#[test]
fn builds_a_complete_workload() {
    let lrp = BuildpackRecipeBuilder::new(config()).build(&valid_spec()).unwrap();

    assert_eq!(lrp.process_guid, "app-1");
    assert_eq!(lrp.domain, APP_DOMAIN);
    assert_eq!(lrp.instances, 3);
    assert_eq!(lrp.annotation, "v1");
    assert_eq!(lrp.root_fs, "preloaded:cflinuxfs3");
    assert_eq!(lrp.ports, vec![8080]);
    assert_eq!(lrp.memory_mb, 512);
    assert_eq!(lrp.disk_mb, 2048);
    assert!(lrp.privileged);
    assert_eq!(lrp.start_timeout_secs, Some(60));
    assert!(lrp.routes.contains_key(shep_core::HTTP_ROUTER_KEY));
    assert_eq!(lrp.environment, vec![EnvVar::new("LANG", "en_US.UTF-8")]);
}

#[test]
fn setup_downloads_lifecycle_then_droplet() {
    let lrp = BuildpackRecipeBuilder::new(config()).build(&valid_spec()).unwrap();

    let Some(Action::Serial(steps)) = lrp.setup else {
        panic!("setup should be a serial action");
    };
    assert_eq!(steps.len(), 2);
    let Action::Download { from, to, cache_key } = &steps[0] else {
        panic!("first setup step should download the lifecycle");
    };
    assert_eq!(from, "https://files.example.com/v1/static/lifecycle.tgz");
    assert_eq!(to, "/tmp/lifecycle");
    assert_eq!(cache_key.as_deref(), Some("buildpack-cflinuxfs3-lifecycle"));

    let Action::Download { from, cache_key, .. } = &steps[1] else {
        panic!("second setup step should download the droplet");
    };
    assert_eq!(from, "https://blobs.example.com/droplets/app-1");
    assert_eq!(cache_key.as_deref(), Some("droplets-app-1"));
}

#[test]
fn run_action_launches_with_start_command_and_app_env() {
    let lrp = BuildpackRecipeBuilder::new(config()).build(&valid_spec()).unwrap();

    let Action::Run { path, args, env, resource_limits } = lrp.action else {
        panic!("action should run the launcher");
    };
    assert_eq!(path, "/tmp/lifecycle/launcher");
    assert_eq!(args, vec!["app", "bundle exec rackup", "{}"]);
    assert!(env.contains(&EnvVar::new("RAILS_ENV", "production")));
    assert!(env.contains(&EnvVar::new("PORT", "8080")));
    assert_eq!(resource_limits.unwrap().nofile, Some(16384));
}

#[test]
fn port_health_check_gets_a_monitor_action() {
    let lrp = BuildpackRecipeBuilder::new(config()).build(&valid_spec()).unwrap();
    let Some(Action::Run { path, args, .. }) = lrp.monitor else {
        panic!("port health check should produce a monitor");
    };
    assert_eq!(path, "/tmp/lifecycle/healthcheck");
    assert_eq!(args, vec!["-port=8080"]);
}

#[test]
fn process_health_check_has_no_monitor() {
    let spec = AppSpec { health_check: HealthCheckType::Process, ..valid_spec() };
    let lrp = BuildpackRecipeBuilder::new(config()).build(&spec).unwrap();
    assert!(lrp.monitor.is_none());
}

#[test]
fn rejects_spec_without_droplet() {
    let spec = AppSpec { source_uri: None, ..valid_spec() };
    let err = BuildpackRecipeBuilder::new(config()).build(&spec).unwrap_err();
    assert_eq!(err, BuildError::DropletSourceMissing);
}

#[test]
fn rejects_spec_with_both_sources() {
    let spec =
        AppSpec { image_uri: Some("docker:///library/app".to_string()), ..valid_spec() };
    let err = BuildpackRecipeBuilder::new(config()).build(&spec).unwrap_err();
    assert_eq!(err, BuildError::MultipleAppSources);
}

#[test]
fn rejects_stack_without_lifecycle_bundle() {
    let spec = AppSpec { stack: "windows2012".to_string(), ..valid_spec() };
    let err = BuildpackRecipeBuilder::new(config()).build(&spec).unwrap_err();
    assert_eq!(
        err,
        BuildError::NoLifecycleDefined { lifecycle: "buildpack/windows2012".to_string() }
    );
}

#[test]
fn default_port_is_the_only_exposed_port() {
    let ports = BuildpackRecipeBuilder::new(config()).exposed_ports(&valid_spec()).unwrap();
    assert_eq!(ports, vec![8080]);
}

#[test]
fn zero_file_descriptors_falls_back_to_default_limit() {
    let spec = AppSpec { file_descriptors: 0, ..valid_spec() };
    let lrp = BuildpackRecipeBuilder::new(config()).build(&spec).unwrap();
    let Action::Run { resource_limits, .. } = lrp.action else {
        panic!("action should run the launcher");
    };
    assert_eq!(resource_limits.unwrap().nofile, Some(1024));
}
