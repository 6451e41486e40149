//! Third-party integrations and file upload settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{ConfigError, EnvSource, Secret, env};

/// Variable read by the spreadsheet client to find its service account.
pub const GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// External service credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    /// Service account file for the Google Sheets connector.
    pub google_credentials_path: PathBuf,
    /// Map tile token, loaded from MAPBOX_API_KEY.
    #[serde(skip_deserializing)]
    pub mapbox_api_key: Secret,
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            google_credentials_path: PathBuf::from("/app/gsheets-service-account.json"),
            mapbox_api_key: Secret::default(),
        }
    }
}

impl IntegrationsConfig {
    pub(super) fn apply_env(&mut self, env: &EnvSource) {
        self.mapbox_api_key = env.secret(env::MAPBOX_API_KEY, "");
    }
}

/// CSV/Excel upload limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub folder: PathBuf,
    pub allowed_extensions: Vec<String>,
    /// Maximum request body size in bytes.
    pub max_content_length: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("/app"),
            allowed_extensions: vec![".csv".into(), ".xls".into(), ".xlsx".into()],
            max_content_length: 100 * 1024 * 1024,
        }
    }
}

impl UploadConfig {
    /// Case-insensitive check of a file name against the allowed extensions.
    pub fn accepts(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.allowed_extensions
            .iter()
            .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "upload.allowed_extensions must not be empty".into(),
            ));
        }
        if self.max_content_length == 0 {
            return Err(ConfigError::Validation(
                "upload.max_content_length must be positive".into(),
            ));
        }
        Ok(())
    }
}
