// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recipe builder for apps launched from a container image.

use crate::builder::{
    cpu_weight, file_descriptor_limit, launch_env, BuildError, BuilderConfig, RecipeBuilder,
    DEFAULT_FILE_DESCRIPTORS, DEFAULT_LANG, DEFAULT_PORT, LRP_LOG_SOURCE,
};
use serde::Deserialize;
use shep_core::{
    Action, AppSpec, CfRoute, DesiredLrp, EnvVar, HealthCheckType, LogConfig, ResourceLimits,
    APP_DOMAIN,
};
use tracing::warn;
use url::Url;

const DOCKER_LIFECYCLE: &str = "docker";

#[derive(Clone)]
pub struct DockerRecipeBuilder {
    config: BuilderConfig,
}

impl DockerRecipeBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }
}

/// Launch metadata recorded at staging time for docker apps.
#[derive(Debug, Default, Deserialize)]
struct DockerExecutionMetadata {
    #[serde(default)]
    ports: Vec<DockerPort>,
}

#[derive(Debug, Deserialize)]
struct DockerPort {
    #[serde(alias = "Port")]
    port: u16,
    #[serde(default = "default_protocol", alias = "Protocol")]
    protocol: String,
}

fn default_protocol() -> String {
    "tcp".to_string()
}

impl RecipeBuilder for DockerRecipeBuilder {
    fn build(&self, spec: &AppSpec) -> Result<DesiredLrp, BuildError> {
        let has_source = spec.source_uri.as_deref().is_some_and(|uri| !uri.is_empty());
        let has_image = spec.image_uri.as_deref().is_some_and(|uri| !uri.is_empty());

        if !has_image {
            warn!(app_id = %spec.app_id, "app spec is missing its docker image");
            return Err(BuildError::DockerImageMissing);
        }
        if has_source {
            warn!(app_id = %spec.app_id, "app spec carries two launch sources");
            return Err(BuildError::MultipleAppSources);
        }

        let image_uri = spec.image_uri.clone().unwrap_or_default();
        let root_fs = docker_root_fs(&image_uri)?;
        let lifecycle_url = self.config.lifecycle_download_url(DOCKER_LIFECYCLE)?;

        let ports = self.exposed_ports(spec)?;
        let port = ports.first().copied().unwrap_or(DEFAULT_PORT);
        let nofile = file_descriptor_limit(spec);

        let setup = Action::Serial(vec![Action::Download {
            from: lifecycle_url,
            to: "/tmp/lifecycle".to_string(),
            cache_key: Some("docker-lifecycle".to_string()),
        }]);

        let action = Action::Run {
            path: "/tmp/lifecycle/launcher".to_string(),
            args: vec![
                "app".to_string(),
                spec.start_command.clone(),
                spec.execution_metadata.clone(),
            ],
            env: launch_env(&spec.environment, port),
            resource_limits: Some(ResourceLimits { nofile: Some(nofile) }),
        };

        let monitor = match spec.health_check {
            HealthCheckType::Port => Some(Action::Run {
                path: "/tmp/lifecycle/healthcheck".to_string(),
                args: vec![format!("-port={port}")],
                env: Vec::new(),
                resource_limits: Some(ResourceLimits {
                    nofile: Some(DEFAULT_FILE_DESCRIPTORS),
                }),
            }),
            HealthCheckType::Process | HealthCheckType::None => None,
        };

        let routes = CfRoute::routing_info(&CfRoute::from_catalog_routes(&spec.routes, &ports));

        Ok(DesiredLrp {
            process_guid: spec.app_id.clone(),
            domain: APP_DOMAIN.to_string(),
            instances: spec.instance_count,
            root_fs,
            stack: spec.stack.clone(),
            ports,
            routes,
            annotation: spec.version_tag.clone(),
            memory_mb: spec.memory_mb,
            disk_mb: spec.disk_mb,
            cpu_weight: cpu_weight(spec.memory_mb),
            privileged: false,
            environment: vec![EnvVar::new("LANG", DEFAULT_LANG)],
            setup: Some(setup),
            action,
            monitor,
            start_timeout_secs: spec.health_check_timeout_secs,
            egress_rules: spec.egress_rules.clone(),
            log: Some(LogConfig {
                guid: spec.log_guid.clone(),
                source_name: LRP_LOG_SOURCE.to_string(),
            }),
            allow_ssh: spec.allow_ssh,
        })
    }

    /// Ports come from the staging-time metadata; an image that exposes
    /// nothing falls back to the platform default.
    fn exposed_ports(&self, spec: &AppSpec) -> Result<Vec<u16>, BuildError> {
        if spec.execution_metadata.trim().is_empty() {
            return Ok(vec![DEFAULT_PORT]);
        }

        let metadata: DockerExecutionMetadata = serde_json::from_str(&spec.execution_metadata)
            .map_err(|e| BuildError::InvalidExecutionMetadata(e.to_string()))?;

        let ports: Vec<u16> = metadata
            .ports
            .iter()
            .filter(|p| p.protocol.eq_ignore_ascii_case("tcp"))
            .map(|p| p.port)
            .collect();

        if ports.is_empty() {
            Ok(vec![DEFAULT_PORT])
        } else {
            Ok(ports)
        }
    }
}

/// Rewrite the image reference under the `docker` scheme the scheduler's
/// root-fs field expects.
fn docker_root_fs(image_uri: &str) -> Result<String, BuildError> {
    let url = match Url::parse(image_uri) {
        Ok(url) => url,
        // Bare references like `cloudfoundry/lattice-app` carry no scheme.
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("docker:///{image_uri}")).map_err(|e| {
                BuildError::InvalidImageUri { uri: image_uri.to_string(), reason: e.to_string() }
            })?
        }
        Err(e) => {
            return Err(BuildError::InvalidImageUri {
                uri: image_uri.to_string(),
                reason: e.to_string(),
            })
        }
    };

    let host = match url.host_str() {
        Some(host) => {
            let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
            format!("{host}{port}")
        }
        None => String::new(),
    };

    Ok(format!("docker://{host}{}", url.path()))
}

#[cfg(test)]
#[path = "docker_tests.rs"]
mod tests;
