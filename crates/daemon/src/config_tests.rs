// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn required_flags() -> Vec<&'static str> {
    vec![
        "shepd",
        "--diegoAPIURL",
        "http://scheduler.example.com",
        "--consulCluster",
        "http://127.0.0.1:8500",
        "--ccBaseURL",
        "https://cc.example.com",
        "--ccUsername",
        "bulk",
        "--ccPassword",
        "secret",
    ]
}

#[parameterized(
    bare_seconds = { "30", Duration::from_secs(30) },
    seconds = { "30s", Duration::from_secs(30) },
    minutes = { "2m", Duration::from_secs(120) },
    hours = { "1h", Duration::from_secs(3600) },
    millis = { "250ms", Duration::from_millis(250) },
)]
fn parse_duration_valid(input: &str, expected: Duration) {
    assert_eq!(parse_duration(input), Ok(expected));
}

#[parameterized(
    empty = { "" },
    no_number = { "s" },
    unknown_suffix = { "10fortnights" },
    negative = { "-5s" },
)]
fn parse_duration_invalid(input: &str) {
    assert!(parse_duration(input).is_err());
}

#[test]
fn defaults_match_the_documented_flags() {
    let config = Config::try_parse_from(required_flags()).unwrap();
    assert_eq!(config.communication_timeout, Duration::from_secs(30));
    assert_eq!(config.polling_interval, Duration::from_secs(30));
    assert_eq!(config.domain_ttl, Duration::from_secs(120));
    assert_eq!(config.bulk_batch_size, 500);
    assert!(!config.skip_cert_verify);
}

#[test]
fn missing_required_flags_fail_parsing() {
    assert!(Config::try_parse_from(["shepd"]).is_err());
}

#[test]
fn lifecycle_map_parses_the_json_flag() {
    let mut flags = required_flags();
    flags.push("--lifecycles");
    flags.push(r#"{"buildpack/cflinuxfs3": "lifecycle.tgz", "docker": "docker.tgz"}"#);

    let config = Config::try_parse_from(flags).unwrap();
    let map = config.lifecycle_map().unwrap();
    assert_eq!(map["buildpack/cflinuxfs3"], "lifecycle.tgz");
    assert_eq!(map["docker"], "docker.tgz");
}

#[test]
fn empty_lifecycle_mapping_is_rejected() {
    let config = Config::try_parse_from(required_flags()).unwrap();
    assert!(matches!(config.lifecycle_map(), Err(ConfigError::InvalidLifecycles(_))));
}

#[test]
fn durations_parse_from_flag_values() {
    let mut flags = required_flags();
    flags.extend(["--pollingInterval", "10s", "--domainTTL", "5m"]);

    let config = Config::try_parse_from(flags).unwrap();
    assert_eq!(config.polling_interval, Duration::from_secs(10));
    assert_eq!(config.domain_ttl, Duration::from_secs(300));
}
