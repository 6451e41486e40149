//! Outgoing email (SMTP) configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ConfigError, EnvSource, Secret, duration, env};

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Implicit TLS from the first byte.
    Ssl,
    /// Plain connection upgraded with STARTTLS.
    StartTls,
    Plain,
}

/// SMTP settings for report and alert emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Loaded from SMTP_PASSWORD.
    #[serde(skip_deserializing)]
    pub password: Secret,
    pub mail_from: String,
    pub use_tls: bool,
    pub use_ssl: bool,
    pub ssl_server_auth: bool,
    #[serde(with = "duration")]
    pub timeout: Duration,
    pub subject_prefix: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 587,
            user: String::new(),
            password: Secret::default(),
            mail_from: String::new(),
            use_tls: true,
            use_ssl: false,
            ssl_server_auth: false,
            timeout: Duration::from_secs(120),
            subject_prefix: "[Superset] ".into(),
        }
    }
}

impl SmtpConfig {
    pub(super) fn apply_env(&mut self, env: &EnvSource) -> Result<(), ConfigError> {
        self.host = env.string(env::SMTP_HOST, &self.host);
        self.port = env.parse(env::SMTP_PORT, self.port)?;
        self.user = env.string(env::SMTP_USER, &self.user);
        self.password = env.secret(env::SMTP_PASSWORD, "");
        self.mail_from = env.string(env::SMTP_MAIL_FROM, &self.mail_from);
        self.use_tls = env.flag(env::SMTP_USE_TLS, self.use_tls);
        self.use_ssl = env.flag(env::SMTP_USE_SSL, self.use_ssl);
        Ok(())
    }

    /// SSL wins when both SSL and TLS are switched on.
    pub fn transport(&self) -> Transport {
        if self.use_ssl {
            Transport::Ssl
        } else if self.use_tls {
            Transport::StartTls
        } else {
            Transport::Plain
        }
    }

    pub fn starttls(&self) -> bool {
        self.use_tls
    }

    pub fn is_configured(&self) -> bool {
        !self.host.is_empty()
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Validation("smtp.port must be positive".into()));
        }
        Ok(())
    }
}
