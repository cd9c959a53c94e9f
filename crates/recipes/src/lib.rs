// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! shep-recipes: pure translators from catalog app specs to scheduler
//! workloads.
//!
//! Two builder variants exist, selected per app: `buildpack` for apps staged
//! from a droplet, `docker` for apps launched from a container image. Both
//! are stateless and freely clonable; the engine only selects and invokes.

mod builder;
pub mod buildpack;
pub mod docker;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{BuilderCall, FakeRecipeBuilders};

pub use builder::{
    BuildError, BuilderConfig, LifecycleBuilders, RecipeBuilder, RecipeBuilders, DEFAULT_PORT,
};
pub use buildpack::BuildpackRecipeBuilder;
pub use docker::DockerRecipeBuilder;
