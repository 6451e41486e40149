//! Redis endpoint and cache backend configuration.

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

use super::{ConfigError, EnvSource, duration, env};

/// Logical database index of the broker, results backend and rate limiter.
pub const BROKER_DB: u8 = 0;
/// Logical database index of the generic object cache.
pub const OBJECT_CACHE_DB: u8 = 1;
/// Logical database index of the data/query result cache.
pub const DATA_CACHE_DB: u8 = 2;

/// Shared Redis host and port for every Redis-backed setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "redis".into(),
            port: 6379,
        }
    }
}

impl RedisConfig {
    pub(super) fn apply_env(&mut self, env: &EnvSource) -> Result<(), ConfigError> {
        self.host = env.string(env::REDIS_HOST, &self.host);
        self.port = env.parse(env::REDIS_PORT, self.port)?;
        Ok(())
    }

    /// URL of one logical database on this server.
    pub fn url(&self, db: u8) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, db)
    }
}

/// Cache backend implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CacheBackend {
    #[default]
    RedisCache,
    SimpleCache,
    NullCache,
}

/// Settings for one named cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Logical database index on the shared Redis server.
    pub db: u8,
    /// Expiry applied when the caller gives none.
    #[serde(with = "duration")]
    pub default_timeout: Duration,
    /// Namespace prepended to every key.
    pub key_prefix: String,
    /// Resolved endpoint (set during assembly).
    pub url: String,
}

impl CacheConfig {
    fn redis(db: u8, default_timeout: Duration, key_prefix: &str) -> Self {
        Self {
            backend: CacheBackend::RedisCache,
            db,
            default_timeout,
            key_prefix: key_prefix.into(),
            url: String::new(),
        }
    }

    /// Copy of this cache that writes under another key namespace.
    pub fn with_key_prefix(&self, key_prefix: &str) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            ..self.clone()
        }
    }

    fn resolve(&mut self, redis: &RedisConfig) {
        self.url = redis.url(self.db);
    }
}

/// Cache section of an overlay; absent fields keep the cache's defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CacheOverlay {
    backend: Option<CacheBackend>,
    db: Option<u8>,
    #[serde(with = "duration::option")]
    default_timeout: Option<Duration>,
    key_prefix: Option<String>,
}

impl CacheOverlay {
    fn merge_into(self, cache: &mut CacheConfig) {
        if let Some(backend) = self.backend {
            cache.backend = backend;
        }
        if let Some(db) = self.db {
            cache.db = db;
        }
        if let Some(timeout) = self.default_timeout {
            cache.default_timeout = timeout;
        }
        if let Some(prefix) = self.key_prefix {
            cache.key_prefix = prefix;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CachesOverlay {
    results: CacheOverlay,
    object: CacheOverlay,
    data: CacheOverlay,
    filter_state_key_prefix: Option<String>,
    explore_form_data_key_prefix: Option<String>,
}

/// All named caches.
///
/// `filter_state` and `explore_form_data` are derived from `object` after
/// overlays are applied; only their key prefixes are configurable. The
/// results backend always lives in the broker database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachesConfig {
    /// Async query results backend.
    pub results: CacheConfig,
    /// Generic object cache.
    pub object: CacheConfig,
    /// Data/query result cache.
    pub data: CacheConfig,
    pub filter_state_key_prefix: String,
    pub explore_form_data_key_prefix: String,
    pub filter_state: CacheConfig,
    pub explore_form_data: CacheConfig,
}

impl Default for CachesConfig {
    fn default() -> Self {
        let object = CacheConfig::redis(
            OBJECT_CACHE_DB,
            Duration::from_secs(300),
            "superset_",
        );
        Self {
            results: CacheConfig::redis(
                BROKER_DB,
                Duration::from_secs(300),
                "superset_results_backend_",
            ),
            data: CacheConfig::redis(
                DATA_CACHE_DB,
                Duration::from_secs(86400),
                "sqlalchemy_",
            ),
            filter_state_key_prefix: "superset_filter_".into(),
            explore_form_data_key_prefix: "superset_explore_form_".into(),
            filter_state: object.with_key_prefix("superset_filter_"),
            explore_form_data: object.with_key_prefix("superset_explore_form_"),
            object,
        }
    }
}

impl<'de> Deserialize<'de> for CachesConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let overlay: Option<CachesOverlay> = Option::deserialize(deserializer)?;
        let mut caches = CachesConfig::default();

        if let Some(overlay) = overlay {
            overlay.results.merge_into(&mut caches.results);
            overlay.object.merge_into(&mut caches.object);
            overlay.data.merge_into(&mut caches.data);
            if let Some(prefix) = overlay.filter_state_key_prefix {
                caches.filter_state_key_prefix = prefix;
            }
            if let Some(prefix) = overlay.explore_form_data_key_prefix {
                caches.explore_form_data_key_prefix = prefix;
            }
        }

        Ok(caches)
    }
}

impl CachesConfig {
    pub(super) fn resolve(&mut self, redis: &RedisConfig, broker_db: u8) {
        self.results.db = broker_db;
        self.results.resolve(redis);
        self.object.resolve(redis);
        self.data.resolve(redis);
        self.filter_state = self.object.with_key_prefix(&self.filter_state_key_prefix);
        self.explore_form_data = self
            .object
            .with_key_prefix(&self.explore_form_data_key_prefix);
    }
}
