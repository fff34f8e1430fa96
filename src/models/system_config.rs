// ABOUTME: System configuration singleton with documented defaults and merge-only updates
// ABOUTME: SystemConfig, its nested sections, and the all-optional patch mirror
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Platform-wide configuration, stored as a single mutable document
///
/// The document is lazily materialized: reads return the documented defaults
/// until the first update writes it, and a partially written document is
/// filled up with defaults field by field on read. Updates are partial merges
/// via [`SystemConfigPatch`]: unspecified fields are always preserved and
/// the document is never replaced wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemConfig {
    /// Reject non-admin traffic while enabled
    pub maintenance_mode: bool,
    /// Whether new accounts may register
    pub registration_enabled: bool,
    /// Default rate limits applied to tenants without overrides
    pub rate_limit: RateLimitDefaults,
    /// Constraints on user uploads
    pub upload: UploadConstraints,
    /// Feature toggles keyed by feature name
    pub feature_flags: BTreeMap<String, bool>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            maintenance_mode: false,
            registration_enabled: true,
            rate_limit: RateLimitDefaults::default(),
            upload: UploadConstraints::default(),
            feature_flags: BTreeMap::new(),
        }
    }
}

/// Default rate limits applied to tenants without overrides
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitDefaults {
    /// Sustained requests per minute
    pub requests_per_minute: u32,
    /// Short-burst allowance on top of the sustained rate
    pub burst: u32,
}

impl Default for RateLimitDefaults {
    fn default() -> Self {
        Self {
            requests_per_minute: 120,
            burst: 40,
        }
    }
}

/// Constraints on user uploads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadConstraints {
    /// Maximum accepted upload size
    pub max_size_bytes: u64,
    /// Accepted MIME types
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadConstraints {
    fn default() -> Self {
        Self {
            max_size_bytes: 10 * 1024 * 1024,
            allowed_mime_types: vec![
                "image/png".into(),
                "image/jpeg".into(),
                "application/pdf".into(),
            ],
        }
    }
}

/// Partial update to the system configuration
///
/// Serializes only the fields that are set, producing exactly the merge
/// patch written to the store. Nested sections patch field by field;
/// `feature_flags` merges per key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_flags: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_per_minute: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burst: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mime_types: Option<Vec<String>>,
}

impl SystemConfigPatch {
    /// Whether the patch changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.maintenance_mode.is_none()
            && self.registration_enabled.is_none()
            && self.rate_limit.is_none()
            && self.upload.is_none()
            && self.feature_flags.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_materialize_from_empty_document() {
        let config: SystemConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(config, SystemConfig::default());
        assert!(!config.maintenance_mode);
        assert!(config.registration_enabled);
        assert_eq!(config.rate_limit.requests_per_minute, 120);
    }

    #[test]
    fn test_partial_document_fills_missing_fields() {
        let config: SystemConfig =
            serde_json::from_value(serde_json::json!({ "maintenanceMode": true })).unwrap();
        assert!(config.maintenance_mode);
        assert!(config.registration_enabled);
        assert_eq!(config.upload.max_size_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = SystemConfigPatch {
            maintenance_mode: Some(true),
            ..SystemConfigPatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "maintenanceMode": true }));
    }

    #[test]
    fn test_nested_patch_serializes_only_set_fields() {
        let patch = SystemConfigPatch {
            rate_limit: Some(RateLimitPatch {
                burst: Some(80),
                ..RateLimitPatch::default()
            }),
            ..SystemConfigPatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "rateLimit": { "burst": 80 } }));
    }
}
