// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn minimal_spec_json() -> &'static str {
    r#"{
        "process_guid": "app-1",
        "etag": "v1",
        "instance_count": 2,
        "source_uri": "https://blobstore.example.com/droplets/app-1",
        "start_command": "bundle exec rackup",
        "stack": "cflinuxfs3",
        "memory_mb": 256,
        "disk_mb": 1024
    }"#
}

#[test]
fn deserializes_with_defaults_for_optional_fields() {
    let spec: AppSpec = serde_json::from_str(minimal_spec_json()).unwrap();
    assert_eq!(spec.app_id, "app-1");
    assert_eq!(spec.instance_count, 2);
    assert_eq!(spec.image_uri, None);
    assert!(spec.routes.is_empty());
    assert!(spec.environment.is_empty());
    assert_eq!(spec.health_check, HealthCheckType::Port);
    assert_eq!(spec.health_check_timeout_secs, None);
    assert!(!spec.allow_ssh);
}

#[test]
fn health_check_type_uses_snake_case_wire_names() {
    let spec: AppSpec = serde_json::from_str(
        &minimal_spec_json().replace(r#""disk_mb": 1024"#, r#""disk_mb": 1024, "health_check": "process""#),
    )
    .unwrap();
    assert_eq!(spec.health_check, HealthCheckType::Process);
}

#[test]
fn routes_carry_optional_ports() {
    let json = r#"[{"hostname": "app.example.com"}, {"hostname": "admin.example.com", "port": 9090}]"#;
    let routes: Vec<HttpRoute> = serde_json::from_str(json).unwrap();
    assert_eq!(routes[0].port, None);
    assert_eq!(routes[1].port, Some(9090));
}
