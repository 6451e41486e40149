//! Typed access to a snapshot of the process environment.
//!
//! An unset or empty variable always resolves to the caller's fallback.

use std::collections::BTreeMap;
use std::env;
use std::fmt::Display;
use std::str::FromStr;

use url::Url;

use super::{ConfigError, Secret};

pub const ADMIN_USERNAME: &str = "ADMIN_USERNAME";
pub const ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";
pub const WEBDRIVER_BASEURL_USER_FRIENDLY: &str = "WEBDRIVER_BASEURL_USER_FRIENDLY";
pub const SMTP_HOST: &str = "SMTP_HOST";
pub const SMTP_PORT: &str = "SMTP_PORT";
pub const SMTP_USER: &str = "SMTP_USER";
pub const SMTP_PASSWORD: &str = "SMTP_PASSWORD";
pub const SMTP_MAIL_FROM: &str = "SMTP_MAIL_FROM";
pub const SMTP_USE_TLS: &str = "SMTP_USE_TLS";
pub const SMTP_USE_SSL: &str = "SMTP_USE_SSL";
pub const POSTGRES_PASSWORD: &str = "POSTGRES_PASSWORD";
pub const REDIS_HOST: &str = "REDIS_HOST";
pub const REDIS_PORT: &str = "REDIS_PORT";
pub const SUPERSET_SECRET_KEY: &str = "SUPERSET_SECRET_KEY";
pub const MAPBOX_API_KEY: &str = "MAPBOX_API_KEY";
pub const SUPERSET_LOG_LEVEL: &str = "SUPERSET_LOG_LEVEL";

/// Read-only view of environment variables taken once at startup.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    vars: BTreeMap<String, String>,
}

impl EnvSource {
    /// Snapshot the current process environment.
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw lookup; empty values count as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn string(&self, key: &str, fallback: &str) -> String {
        self.get(key).unwrap_or(fallback).to_string()
    }

    pub fn secret(&self, key: &str, fallback: &str) -> Secret {
        Secret::new(self.string(key, fallback))
    }

    /// A set value is true only when it reads exactly "true", ignoring case.
    pub fn flag(&self, key: &str, fallback: bool) -> bool {
        match self.get(key) {
            Some(v) => v.eq_ignore_ascii_case("true"),
            None => fallback,
        }
    }

    pub fn parse<T>(&self, key: &str, fallback: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(fallback),
        }
    }

    /// Like [`EnvSource::string`], but the value must parse as an absolute URL.
    /// The text is kept as written; `Url` would append a trailing slash.
    pub fn url(&self, key: &str, fallback: &str) -> Result<String, ConfigError> {
        let value = self.string(key, fallback);
        Url::parse(&value).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.clone(),
            reason: e.to_string(),
        })?;
        Ok(value)
    }
}
