//! Metadata database configuration.

use serde::{Deserialize, Serialize};

use super::{EnvSource, Secret, env};

pub const DEFAULT_PASSWORD: &str = "superset";

/// Connection settings for the metadata database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLAlchemy dialect and driver, e.g. "postgresql+psycopg2".
    pub driver: String,
    pub user: String,
    /// Loaded from POSTGRES_PASSWORD.
    #[serde(skip_deserializing)]
    pub password: Secret,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Composed connection string (set during assembly).
    #[serde(skip_deserializing)]
    pub uri: Secret,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: "postgresql+psycopg2".into(),
            user: "superset".into(),
            password: Secret::new(DEFAULT_PASSWORD),
            host: "db".into(),
            port: 5432,
            name: "superset".into(),
            uri: Secret::default(),
        }
    }
}

impl DatabaseConfig {
    pub(super) fn apply_env(&mut self, env: &EnvSource) {
        self.password = env.secret(env::POSTGRES_PASSWORD, DEFAULT_PASSWORD);
    }

    pub(super) fn resolve(&mut self) {
        self.uri = Secret::new(format!(
            "{}://{}:{}@{}:{}/{}",
            self.driver,
            urlencoding::encode(&self.user),
            urlencoding::encode(self.password.expose()),
            self.host,
            self.port,
            self.name
        ));
    }

    pub fn uses_default_password(&self) -> bool {
        self.password.expose() == DEFAULT_PASSWORD
    }
}
