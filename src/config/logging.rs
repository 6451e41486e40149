//! Log verbosity settings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{EnvSource, env};

/// Global level plus per-target overrides for noisy libraries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// "trace", "debug", "info", "warn" or "error".
    pub level: String,
    pub target_levels: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut target_levels = BTreeMap::new();
        target_levels.insert("paramiko".to_string(), "warn".to_string());

        Self {
            level: "info".into(),
            target_levels,
        }
    }
}

impl LoggingConfig {
    pub(super) fn apply_env(&mut self, env: &EnvSource) {
        self.level = env.string(env::SUPERSET_LOG_LEVEL, &self.level);
    }

    /// Filter directives in `EnvFilter` syntax, e.g. "info,paramiko=warn".
    pub fn filter_directives(&self) -> String {
        let mut directives = vec![self.level.clone()];
        directives.extend(
            self.target_levels
                .iter()
                .map(|(target, level)| format!("{}={}", target, level)),
        );
        directives.join(",")
    }
}
