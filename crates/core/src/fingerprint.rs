// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal app identity used for cheap diffing.

use serde::{Deserialize, Serialize};

/// The `(app_id, version_tag)` pair the catalog's bulk API exposes for every
/// desired app.
///
/// Version tags are opaque; two fingerprints refer to the same app version
/// exactly when the tags are byte-equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppFingerprint {
    #[serde(rename = "process_guid")]
    pub app_id: String,
    #[serde(rename = "etag")]
    pub version_tag: String,
}

impl AppFingerprint {
    pub fn new(app_id: impl Into<String>, version_tag: impl Into<String>) -> Self {
        Self { app_id: app_id.into(), version_tag: version_tag.into() }
    }
}

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod tests;
