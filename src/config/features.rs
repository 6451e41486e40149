//! Feature flag configuration.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const EMAIL_NOTIFICATIONS: &str = "EMAIL_NOTIFICATIONS";
pub const ALERT_REPORTS: &str = "ALERT_REPORTS";
pub const ALERT_REPORTS_NOTIFICATION_DRY_RUN: &str = "ALERT_REPORTS_NOTIFICATION_DRY_RUN";

const ENABLED_BY_DEFAULT: &[&str] = &[
    "SHILLELAGH",
    "ENABLE_TEMPLATE_PROCESSING",
    "EMBEDDED_SUPERSET",
    "SSH_TUNNELING",
    "ENABLE_FILE_UPLOAD",
    "DASHBOARD_NATIVE_FILTERS",
    "ENABLE_REACT_CRUD_VIEWS",
    "DASHBOARD_RBAC",
    "ENABLE_SCHEDULED_EMAIL_REPORTS",
    ALERT_REPORTS,
    "THUMBNAILS",
    "ENABLE_GLOBAL_SEARCH",
    "ENABLE_EXPLORE_DRAG_AND_DROP",
    "ENABLE_DATA_EXPORT",
    "ENABLE_SQL_LAB_IMPROVEMENTS",
    "ENABLE_CUSTOM_METRICS",
    "ENABLE_ANNOTATIONS",
    "ENABLE_QUERY_CACHING",
    EMAIL_NOTIFICATIONS,
    "DASHBOARD_CROSS_FILTERS",
    "DASHBOARD_NATIVE_FILTERS_SET",
    "DRILL_BY",
    "DYNAMIC_PLUGINS",
    "HORIZONTAL_FILTER_BAR",
    "ENABLE_TIME_SERIES_FORECAST2",
    "ALLOW_GUEST_TOKEN_JINJA_CONTEXT",
    "ENABLE_EXPLORE_JSON_CSRF",
    "ENABLE_SIP_34_METADATA_FIX",
    "SCHEDULED_QUERIES",
    "VERSIONED_EXPORT",
    "TEMPLATE_PROCESSING_JINJA",
    "TAGGING_SYSTEM",
];

/// Feature name to on/off switch, ordered by name.
///
/// Deserializing merges the given map over the defaults, so an overlay
/// only needs to list the flags it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureFlags(BTreeMap<String, bool>);

impl FeatureFlags {
    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        let mut flags: BTreeMap<String, bool> = ENABLED_BY_DEFAULT
            .iter()
            .map(|name| (name.to_string(), true))
            .collect();
        flags.insert(ALERT_REPORTS_NOTIFICATION_DRY_RUN.to_string(), false);
        Self(flags)
    }
}

impl<'de> Deserialize<'de> for FeatureFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let overrides: Option<BTreeMap<String, bool>> = Option::deserialize(deserializer)?;
        let mut flags = FeatureFlags::default();
        flags.0.extend(overrides.unwrap_or_default());
        Ok(flags)
    }
}
