//! Headless browser (screenshot/report render worker) configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::{ConfigError, EnvSource, Secret, duration, env};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

const DEFAULT_BASE_URL: &str = "http://superset_web:8088";
const DEFAULT_USER_FRIENDLY_URL: &str = "http://localhost:8088";

const CHROME_ARGS: &[&str] = &[
    "--headless=new",
    "--disable-gpu",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-setuid-sandbox",
    "--disable-extensions",
    "--disable-software-rasterizer",
    "--disable-background-networking",
    "--disable-default-apps",
    "--disable-sync",
    "--disable-translate",
    "--hide-scrollbars",
    "--metrics-recording-only",
    "--mute-audio",
    "--no-first-run",
    "--safebrowsing-disable-auto-update",
    "--ignore-certificate-errors",
    "--ignore-ssl-errors",
    "--disable-blink-features=AutomationControlled",
    "--window-size=1920,1080",
    "--force-device-scale-factor=1",
];

/// Browser driving the render worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chrome,
    Firefox,
}

/// Render worker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDriverConfig {
    pub browser: Browser,
    pub option_args: Vec<String>,
    /// Internal address the worker browses.
    pub base_url: String,
    /// `base_url` with the admin credentials embedded (set during assembly).
    #[serde(skip_deserializing)]
    pub reports_base_url: Secret,
    /// Address placed in emailed links, from WEBDRIVER_BASEURL_USER_FRIENDLY.
    pub user_friendly_base_url: String,
    #[serde(skip_deserializing)]
    pub admin_username: Secret,
    #[serde(skip_deserializing)]
    pub admin_password: Secret,
    #[serde(with = "duration")]
    pub screenshot_locate_wait: Duration,
    #[serde(with = "duration")]
    pub screenshot_load_wait: Duration,
    #[serde(with = "duration")]
    pub wait_time: Duration,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            browser: Browser::Chrome,
            option_args: CHROME_ARGS.iter().map(|a| a.to_string()).collect(),
            base_url: DEFAULT_BASE_URL.into(),
            reports_base_url: Secret::default(),
            user_friendly_base_url: DEFAULT_USER_FRIENDLY_URL.into(),
            admin_username: Secret::new(DEFAULT_ADMIN_USERNAME),
            admin_password: Secret::new(DEFAULT_ADMIN_PASSWORD),
            screenshot_locate_wait: Duration::from_secs(30),
            screenshot_load_wait: Duration::from_secs(90),
            wait_time: Duration::from_secs(90),
        }
    }
}

impl WebDriverConfig {
    pub(super) fn apply_env(&mut self, env: &EnvSource) -> Result<(), ConfigError> {
        self.admin_username = env.secret(env::ADMIN_USERNAME, DEFAULT_ADMIN_USERNAME);
        self.admin_password = env.secret(env::ADMIN_PASSWORD, DEFAULT_ADMIN_PASSWORD);
        self.user_friendly_base_url =
            env.url(env::WEBDRIVER_BASEURL_USER_FRIENDLY, &self.user_friendly_base_url)?;
        Ok(())
    }

    pub(super) fn resolve(&mut self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: "webdriver.base_url".into(),
            value: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.set_username(self.admin_username.expose())
            .map_err(|_| invalid("cannot carry credentials".into()))?;
        url.set_password(Some(self.admin_password.expose()))
            .map_err(|_| invalid("cannot carry credentials".into()))?;

        self.reports_base_url = Secret::new(url.as_str().trim_end_matches('/'));
        Ok(())
    }

    pub fn uses_default_admin(&self) -> bool {
        self.admin_username.expose() == DEFAULT_ADMIN_USERNAME
            && self.admin_password.expose() == DEFAULT_ADMIN_PASSWORD
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        let waits = [
            ("screenshot_locate_wait", self.screenshot_locate_wait),
            ("screenshot_load_wait", self.screenshot_load_wait),
            ("wait_time", self.wait_time),
        ];
        for (name, wait) in waits {
            if wait.is_zero() {
                return Err(ConfigError::Validation(format!(
                    "webdriver.{} must be positive",
                    name
                )));
            }
        }
        Ok(())
    }
}
