// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recipe builder for apps staged from a droplet.

use crate::builder::{
    cpu_weight, file_descriptor_limit, launch_env, BuildError, BuilderConfig, RecipeBuilder,
    DEFAULT_FILE_DESCRIPTORS, DEFAULT_LANG, DEFAULT_PORT, LRP_LOG_SOURCE,
};
use shep_core::{
    Action, AppSpec, CfRoute, DesiredLrp, EnvVar, HealthCheckType, LogConfig, ResourceLimits,
    APP_DOMAIN,
};
use tracing::warn;

#[derive(Clone)]
pub struct BuildpackRecipeBuilder {
    config: BuilderConfig,
}

impl BuildpackRecipeBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }
}

impl RecipeBuilder for BuildpackRecipeBuilder {
    fn build(&self, spec: &AppSpec) -> Result<DesiredLrp, BuildError> {
        let has_source = spec.source_uri.as_deref().is_some_and(|uri| !uri.is_empty());
        let has_image = spec.image_uri.as_deref().is_some_and(|uri| !uri.is_empty());

        if !has_source {
            warn!(app_id = %spec.app_id, "app spec is missing its droplet source");
            return Err(BuildError::DropletSourceMissing);
        }
        if has_image {
            warn!(app_id = %spec.app_id, "app spec carries two launch sources");
            return Err(BuildError::MultipleAppSources);
        }

        let lifecycle = format!("buildpack/{}", spec.stack);
        let lifecycle_url = self.config.lifecycle_download_url(&lifecycle)?;
        let source_uri = spec.source_uri.clone().unwrap_or_default();

        let port = DEFAULT_PORT;
        let nofile = file_descriptor_limit(spec);

        let setup = Action::Serial(vec![
            Action::Download {
                from: lifecycle_url,
                to: "/tmp/lifecycle".to_string(),
                cache_key: Some(format!("buildpack-{}-lifecycle", spec.stack)),
            },
            Action::Download {
                from: source_uri,
                to: ".".to_string(),
                cache_key: Some(format!("droplets-{}", spec.app_id)),
            },
        ]);

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

        let routes =
            CfRoute::routing_info(&CfRoute::from_catalog_routes(&spec.routes, &[port]));

        Ok(DesiredLrp {
            process_guid: spec.app_id.clone(),
            domain: APP_DOMAIN.to_string(),
            instances: spec.instance_count,
            root_fs: format!("preloaded:{}", spec.stack),
            stack: spec.stack.clone(),
            ports: vec![port],
            routes,
            annotation: spec.version_tag.clone(),
            memory_mb: spec.memory_mb,
            disk_mb: spec.disk_mb,
            cpu_weight: cpu_weight(spec.memory_mb),
            privileged: true,
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

    fn exposed_ports(&self, _spec: &AppSpec) -> Result<Vec<u16>, BuildError> {
        Ok(vec![DEFAULT_PORT])
    }
}

#[cfg(test)]
#[path = "buildpack_tests.rs"]
mod tests;
