//! Settings assembly for the Superset deployment.
//!
//! Compiled-in defaults are overlaid by an optional YAML file of non-secret
//! settings, then by environment variables. Credentials are only ever read
//! from the environment.

mod branding;
mod cache;
mod database;
mod duration;
mod env;
mod error;
mod features;
mod integrations;
mod logging;
mod mail;
mod queue;
mod secret;
mod security;
mod webdriver;

pub use branding::{BrandingConfig, Language, LocaleConfig, NumberFormat};
pub use cache::{
    BROKER_DB, CacheBackend, CacheConfig, CachesConfig, DATA_CACHE_DB, OBJECT_CACHE_DB,
    RedisConfig,
};
pub use database::DatabaseConfig;
pub use env::EnvSource;
pub use error::ConfigError;
pub use features::{
    ALERT_REPORTS, ALERT_REPORTS_NOTIFICATION_DRY_RUN, EMAIL_NOTIFICATIONS, FeatureFlags,
};
pub use integrations::{GOOGLE_APPLICATION_CREDENTIALS, IntegrationsConfig, UploadConfig};
pub use logging::LoggingConfig;
pub use mail::{SmtpConfig, Transport};
pub use queue::{
    Crontab, LimitsConfig, RateLimit, RatePeriod, ScheduleEntry, TaskAnnotation, TaskQueueConfig,
};
pub use secret::Secret;
pub use security::{CorsOptions, PLACEHOLDER_SECRET_KEY, ProxyFixConfig, SecurityConfig};
pub use webdriver::{Browser, WebDriverConfig};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;

/// Resolved, read-only settings snapshot.
///
/// Built once at startup and passed by reference to whatever needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub feature_flags: FeatureFlags,
    /// Shared Redis server for caches, broker and rate limiter.
    pub redis: RedisConfig,
    pub caches: CachesConfig,
    pub task_queue: TaskQueueConfig,
    pub limits: LimitsConfig,
    pub smtp: SmtpConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub branding: BrandingConfig,
    pub locale: LocaleConfig,
    /// Screenshot and report render worker.
    pub webdriver: WebDriverConfig,
    pub integrations: IntegrationsConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Assemble settings from compiled-in defaults and the environment.
    pub fn assemble(env: &EnvSource) -> Result<Self, ConfigError> {
        Self::default().finish(env)
    }

    /// Assemble settings with a YAML overlay read from `path`.
    ///
    /// The overlay may set any non-secret field; omitted fields keep their
    /// defaults. Environment variables still take precedence.
    pub fn load(path: &str, env: &EnvSource) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content, env)
    }

    /// Same as [`Settings::load`] with the overlay given inline.
    pub fn from_yaml_str(yaml: &str, env: &EnvSource) -> Result<Self, ConfigError> {
        // An empty document deserializes to null rather than a mapping.
        let settings: Settings = if yaml.trim().is_empty() {
            Settings::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        settings.finish(env)
    }

    fn finish(mut self, env: &EnvSource) -> Result<Self, ConfigError> {
        self.apply_env(env)?;
        self.resolve()?;
        self.validate()?;
        Ok(self)
    }

    /// Overwrite fields from environment variables.
    fn apply_env(&mut self, env: &EnvSource) -> Result<(), ConfigError> {
        self.redis.apply_env(env)?;
        self.smtp.apply_env(env)?;
        self.database.apply_env(env);
        self.security.apply_env(env);
        self.webdriver.apply_env(env)?;
        self.integrations.apply_env(env);
        self.logging.apply_env(env);
        Ok(())
    }

    /// Fill derived values: endpoints, connection strings, derived caches.
    fn resolve(&mut self) -> Result<(), ConfigError> {
        let broker_db = self.task_queue.broker_db;
        self.caches.resolve(&self.redis, broker_db);
        self.task_queue.resolve(&self.redis);
        self.security.resolve(&self.redis, broker_db);
        self.database.resolve();
        self.webdriver.resolve()?;
        Ok(())
    }

    /// Validate the assembled settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let indexes = [
            ("task_queue.broker_db", self.task_queue.broker_db),
            ("caches.object.db", self.caches.object.db),
            ("caches.data.db", self.caches.data.db),
        ];
        for (i, (name, db)) in indexes.iter().enumerate() {
            if let Some((other, _)) = indexes[i + 1..].iter().find(|(_, d)| d == db) {
                return Err(ConfigError::Validation(format!(
                    "{} and {} share redis database {}",
                    name, other, db
                )));
            }
        }

        self.task_queue.validate()?;
        self.smtp.validate()?;
        self.webdriver.validate()?;
        self.upload.validate()?;

        Ok(())
    }

    /// Process variables third-party clients read to locate credentials.
    pub fn process_env_exports(&self) -> Vec<(&'static str, String)> {
        vec![(
            GOOGLE_APPLICATION_CREDENTIALS,
            self.integrations
                .google_credentials_path
                .display()
                .to_string(),
        )]
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Hex SHA-256 of the canonical JSON form.
    ///
    /// Equal environments and overlays always give equal fingerprints.
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        let canonical = serde_json::to_vec(self)?;
        Ok(hex::encode(Sha256::digest(&canonical)))
    }
}

#[cfg(test)]
mod tests;
