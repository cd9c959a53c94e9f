// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builder trait, shared construction helpers, and the per-app selection
//! facade.

use shep_core::{AppSpec, DesiredLrp, EnvVar};
use std::collections::HashMap;
use thiserror::Error;

use crate::buildpack::BuildpackRecipeBuilder;
use crate::docker::DockerRecipeBuilder;

/// Port every app listens on unless its launch metadata says otherwise.
pub const DEFAULT_PORT: u16 = 8080;

/// File-descriptor limit applied when the spec does not carry one.
pub(crate) const DEFAULT_FILE_DESCRIPTORS: u64 = 1024;

pub(crate) const DEFAULT_LANG: &str = "en_US.UTF-8";
pub(crate) const LRP_LOG_SOURCE: &str = "CELL";

/// Memory size at which an app saturates its CPU share.
const CPU_WEIGHT_MAX_MEMORY_MB: u32 = 8192;

/// Translation failures. All of these are permanent for the offending spec;
/// retrying without a catalog change is pointless.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("app spec has no droplet source; a droplet URI is required")]
    DropletSourceMissing,

    #[error("app spec has no docker image; an image URI is required")]
    DockerImageMissing,

    #[error("app spec carries both a droplet URI and a docker image; exactly one is required")]
    MultipleAppSources,

    #[error("no lifecycle bundle defined for '{lifecycle}'")]
    NoLifecycleDefined { lifecycle: String },

    #[error("invalid docker image URI '{uri}': {reason}")]
    InvalidImageUri { uri: String, reason: String },

    #[error("invalid execution metadata: {0}")]
    InvalidExecutionMetadata(String),
}

/// Static configuration shared by both builder variants.
#[derive(Debug, Clone, Default)]
pub struct BuilderConfig {
    /// Lifecycle bundle paths keyed by lifecycle name
    /// (`buildpack/<stack>`, `docker`).
    pub lifecycles: HashMap<String, String>,
    /// Base URL of the file server hosting the bundles.
    pub file_server_url: String,
}

impl BuilderConfig {
    pub(crate) fn lifecycle_download_url(&self, lifecycle: &str) -> Result<String, BuildError> {
        let path = self.lifecycles.get(lifecycle).ok_or_else(|| {
            BuildError::NoLifecycleDefined { lifecycle: lifecycle.to_string() }
        })?;
        Ok(format!(
            "{}/v1/static/{}",
            self.file_server_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}

/// A pure translator from one app spec to one scheduler workload.
pub trait RecipeBuilder: Send + Sync {
    /// Construct the scheduler's workload description for this app.
    fn build(&self, spec: &AppSpec) -> Result<DesiredLrp, BuildError>;

    /// Derive the default TCP ports the workload advertises.
    fn exposed_ports(&self, spec: &AppSpec) -> Result<Vec<u16>, BuildError>;
}

/// Per-app builder selection, as the engine consumes it.
pub trait RecipeBuilders: Send + Sync + 'static {
    fn build(&self, spec: &AppSpec) -> Result<DesiredLrp, BuildError>;
    fn exposed_ports(&self, spec: &AppSpec) -> Result<Vec<u16>, BuildError>;
}

/// The production builder set: a non-empty `image_uri` selects the docker
/// variant, anything else the buildpack variant.
#[derive(Clone)]
pub struct LifecycleBuilders {
    buildpack: BuildpackRecipeBuilder,
    docker: DockerRecipeBuilder,
}

impl LifecycleBuilders {
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            buildpack: BuildpackRecipeBuilder::new(config.clone()),
            docker: DockerRecipeBuilder::new(config),
        }
    }

    fn select(&self, spec: &AppSpec) -> &dyn RecipeBuilder {
        if spec.image_uri.as_deref().is_some_and(|uri| !uri.is_empty()) {
            &self.docker
        } else {
            &self.buildpack
        }
    }
}

impl RecipeBuilders for LifecycleBuilders {
    fn build(&self, spec: &AppSpec) -> Result<DesiredLrp, BuildError> {
        self.select(spec).build(spec)
    }

    fn exposed_ports(&self, spec: &AppSpec) -> Result<Vec<u16>, BuildError> {
        self.select(spec).exposed_ports(spec)
    }
}

/// CPU share proportional to the memory quota, saturating at 100.
pub(crate) fn cpu_weight(memory_mb: u32) -> u32 {
    if memory_mb >= CPU_WEIGHT_MAX_MEMORY_MB {
        100
    } else {
        memory_mb * 100 / CPU_WEIGHT_MAX_MEMORY_MB
    }
}

/// App environment plus the variables the platform injects at launch.
pub(crate) fn launch_env(environment: &[EnvVar], port: u16) -> Vec<EnvVar> {
    let mut env = environment.to_vec();
    env.push(EnvVar::new("PORT", port.to_string()));
    env.push(EnvVar::new("VCAP_APP_PORT", port.to_string()));
    env.push(EnvVar::new("VCAP_APP_HOST", "0.0.0.0"));
    env
}

pub(crate) fn file_descriptor_limit(spec: &AppSpec) -> u64 {
    if spec.file_descriptors == 0 {
        DEFAULT_FILE_DESCRIPTORS
    } else {
        spec.file_descriptors
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
