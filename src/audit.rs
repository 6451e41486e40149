//! Production-safety review of an assembled settings snapshot.
//!
//! Findings never block assembly; the bootstrap decides what to do with them.

use std::fmt;

use serde::Serialize;

use crate::config::{
    ALERT_REPORTS, ALERT_REPORTS_NOTIFICATION_DRY_RUN, EMAIL_NOTIFICATIONS, Settings,
};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Critical => f.write_str("critical"),
        }
    }
}

/// A setting that is unsafe or suspicious for a production deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Dotted path of the offending setting.
    pub key: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn critical(key: &'static str, message: impl Into<String>) -> Self {
        Self {
            key,
            severity: Severity::Critical,
            message: message.into(),
        }
    }

    fn warning(key: &'static str, message: impl Into<String>) -> Self {
        Self {
            key,
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Review settings for production use, most severe findings first.
pub fn audit(settings: &Settings) -> Vec<Finding> {
    let mut findings = Vec::new();

    if settings.security.uses_placeholder_secret() {
        findings.push(Finding::critical(
            "security.secret_key",
            "secret key is the placeholder; set SUPERSET_SECRET_KEY",
        ));
    }

    if settings.webdriver.uses_default_admin() {
        findings.push(Finding::critical(
            "webdriver.admin_password",
            "render worker uses admin/admin; set ADMIN_USERNAME and ADMIN_PASSWORD",
        ));
    }

    if settings.database.uses_default_password() {
        findings.push(Finding::critical(
            "database.password",
            "database password is the default; set POSTGRES_PASSWORD",
        ));
    }

    if settings.security.debug {
        findings.push(Finding::critical(
            "security.debug",
            "debug mode is enabled",
        ));
    }

    let cors = &settings.security.cors;
    if settings.security.enable_cors && cors.supports_credentials && cors.allows_any_origin() {
        findings.push(Finding::warning(
            "security.cors.origins",
            "CORS accepts any origin while allowing credentials",
        ));
    }

    let smtp = &settings.smtp;
    if smtp.use_tls && smtp.use_ssl {
        findings.push(Finding::warning(
            "smtp.use_ssl",
            "both SMTP_USE_TLS and SMTP_USE_SSL are set; SSL will be used",
        ));
    }

    let flags = &settings.feature_flags;
    if !smtp.is_configured()
        && (flags.is_enabled(EMAIL_NOTIFICATIONS) || flags.is_enabled(ALERT_REPORTS))
    {
        findings.push(Finding::warning(
            "smtp.host",
            "email reports are enabled but SMTP_HOST is not set",
        ));
    }

    if flags.is_enabled(ALERT_REPORTS_NOTIFICATION_DRY_RUN) {
        findings.push(Finding::warning(
            "feature_flags.ALERT_REPORTS_NOTIFICATION_DRY_RUN",
            "alert and report notifications are not delivered in dry-run mode",
        ));
    }

    if !settings.security.talisman_enabled {
        findings.push(Finding::warning(
            "security.talisman_enabled",
            "content security policy headers are disabled",
        ));
    }

    if settings.integrations.mapbox_api_key.is_empty() {
        findings.push(Finding::warning(
            "integrations.mapbox_api_key",
            "MAPBOX_API_KEY is not set; map charts will not render tiles",
        ));
    }

    findings.sort_by(|a, b| b.severity.cmp(&a.severity));
    findings
}

/// True when any finding must block a production rollout.
pub fn has_critical(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Critical)
}
