//! Secret key, reverse proxy, CORS and CSP settings.

use serde::{Deserialize, Serialize};

use super::cache::RedisConfig;
use super::{EnvSource, Secret, env};

/// Placeholder used when SUPERSET_SECRET_KEY is not set.
pub const PLACEHOLDER_SECRET_KEY: &str = "CHANGE_THIS_SECRET_KEY";

/// Web security settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Session signing key, loaded from SUPERSET_SECRET_KEY.
    #[serde(skip_deserializing)]
    pub secret_key: Secret,
    pub debug: bool,
    /// Framework environment name: "production" or "development".
    pub environment: String,
    pub enable_proxy_fix: bool,
    pub proxy_fix: ProxyFixConfig,
    pub enable_cors: bool,
    pub cors: CorsOptions,
    pub content_security_policy_warning: bool,
    pub talisman_enabled: bool,
    /// Storage for the request rate limiter (set during assembly).
    #[serde(skip_deserializing)]
    pub ratelimit_storage_uri: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: Secret::new(PLACEHOLDER_SECRET_KEY),
            debug: false,
            environment: "production".into(),
            enable_proxy_fix: true,
            proxy_fix: ProxyFixConfig::default(),
            enable_cors: true,
            cors: CorsOptions::default(),
            content_security_policy_warning: false,
            talisman_enabled: false,
            ratelimit_storage_uri: String::new(),
        }
    }
}

impl SecurityConfig {
    pub(super) fn apply_env(&mut self, env: &EnvSource) {
        self.secret_key = env.secret(env::SUPERSET_SECRET_KEY, PLACEHOLDER_SECRET_KEY);
    }

    /// The rate limiter shares the broker database.
    pub(super) fn resolve(&mut self, redis: &RedisConfig, broker_db: u8) {
        self.ratelimit_storage_uri = redis.url(broker_db);
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.secret_key.expose() == PLACEHOLDER_SECRET_KEY
    }
}

/// Number of trusted proxy hops per forwarded header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyFixConfig {
    pub x_for: u8,
    pub x_proto: u8,
    pub x_host: u8,
    pub x_port: u8,
    pub x_prefix: u8,
}

impl Default for ProxyFixConfig {
    fn default() -> Self {
        Self {
            x_for: 1,
            x_proto: 1,
            x_host: 1,
            x_port: 0,
            x_prefix: 1,
        }
    }
}

/// Cross-origin policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsOptions {
    pub supports_credentials: bool,
    pub allow_headers: Vec<String>,
    pub expose_headers: Vec<String>,
    pub origins: Vec<String>,
}

impl Default for CorsOptions {
    fn default() -> Self {
        Self {
            supports_credentials: true,
            allow_headers: vec!["*".into()],
            expose_headers: vec!["*".into()],
            origins: vec!["*".into()],
        }
    }
}

impl CorsOptions {
    pub fn allows_any_origin(&self) -> bool {
        self.origins.iter().any(|o| o == "*")
    }
}
