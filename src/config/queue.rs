//! Background task queue (broker, workers, periodic schedule) configuration.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::cache::{BROKER_DB, RedisConfig};
use super::{ConfigError, duration};

/// Broker, result store and per-task execution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskQueueConfig {
    /// Logical Redis database for the broker and result store.
    pub broker_db: u8,
    #[serde(skip_deserializing)]
    pub broker_url: String,
    #[serde(skip_deserializing)]
    pub result_backend_url: String,
    /// Modules the worker imports to register tasks.
    pub imports: Vec<String>,
    pub worker_prefetch_multiplier: u32,
    pub task_acks_late: bool,
    /// Execution limits keyed by task name.
    pub annotations: BTreeMap<String, TaskAnnotation>,
    /// Periodic entries keyed by schedule name.
    pub beat_schedule: BTreeMap<String, ScheduleEntry>,
}

impl Default for TaskQueueConfig {
    fn default() -> Self {
        let mut annotations = BTreeMap::new();
        annotations.insert(
            "sql_lab.get_sql_results".to_string(),
            TaskAnnotation {
                rate_limit: Some(RateLimit::new(100, RatePeriod::Second)),
                ..TaskAnnotation::default()
            },
        );
        annotations.insert(
            "reports.execute".to_string(),
            TaskAnnotation {
                time_limit: Some(Duration::from_secs(600)),
                soft_time_limit: Some(Duration::from_secs(540)),
                ..TaskAnnotation::default()
            },
        );

        let mut beat_schedule = BTreeMap::new();
        beat_schedule.insert(
            "reports.scheduler".to_string(),
            ScheduleEntry {
                task: "reports.scheduler".into(),
                schedule: Crontab::default(),
            },
        );
        beat_schedule.insert(
            "reports.prune_log".to_string(),
            ScheduleEntry {
                task: "reports.prune_log".into(),
                schedule: Crontab {
                    minute: "0".into(),
                    hour: "0".into(),
                    ..Crontab::default()
                },
            },
        );

        Self {
            broker_db: BROKER_DB,
            broker_url: String::new(),
            result_backend_url: String::new(),
            imports: vec![
                "superset.sql_lab".into(),
                "superset.tasks.scheduler".into(),
            ],
            worker_prefetch_multiplier: 1,
            task_acks_late: true,
            annotations,
            beat_schedule,
        }
    }
}

impl TaskQueueConfig {
    pub(super) fn resolve(&mut self, redis: &RedisConfig) {
        self.broker_url = redis.url(self.broker_db);
        self.result_backend_url = redis.url(self.broker_db);
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_prefetch_multiplier == 0 {
            return Err(ConfigError::Validation(
                "task_queue.worker_prefetch_multiplier must be positive".into(),
            ));
        }

        for (task, annotation) in &self.annotations {
            if let (Some(soft), Some(hard)) = (annotation.soft_time_limit, annotation.time_limit) {
                if soft >= hard {
                    return Err(ConfigError::Validation(format!(
                        "task {}: soft_time_limit ({}s) must be below time_limit ({}s)",
                        task,
                        soft.as_secs(),
                        hard.as_secs()
                    )));
                }
            }
        }

        for (name, entry) in &self.beat_schedule {
            if entry.task.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "beat_schedule {}: task is required",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Per-task execution limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskAnnotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,
    /// Forced termination threshold.
    #[serde(with = "duration::option", skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<Duration>,
    /// Cooperative cancellation threshold; must stay below `time_limit`.
    #[serde(with = "duration::option", skip_serializing_if = "Option::is_none")]
    pub soft_time_limit: Option<Duration>,
}

/// Unit of a task rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatePeriod {
    Second,
    Minute,
    Hour,
}

impl RatePeriod {
    fn suffix(self) -> &'static str {
        match self {
            RatePeriod::Second => "s",
            RatePeriod::Minute => "m",
            RatePeriod::Hour => "h",
        }
    }
}

/// Task rate limit written as "100/s", "10/m" or "1/h".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub tasks: u32,
    pub period: RatePeriod,
}

impl RateLimit {
    pub fn new(tasks: u32, period: RatePeriod) -> Self {
        Self { tasks, period }
    }
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tasks, self.period.suffix())
    }
}

impl FromStr for RateLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (count, unit) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| format!("rate limit must look like N/s, got {}", s))?;

        let tasks = count
            .trim()
            .parse()
            .map_err(|_| format!("invalid rate limit count: {}", count))?;

        let period = match unit.trim() {
            "s" => RatePeriod::Second,
            "m" => RatePeriod::Minute,
            "h" => RatePeriod::Hour,
            other => return Err(format!("unknown rate limit unit: {}", other)),
        };

        Ok(Self { tasks, period })
    }
}

impl Serialize for RateLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RateLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One periodic task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub task: String,
    #[serde(default)]
    pub schedule: Crontab,
}

/// Crontab-style recurrence rule; every field defaults to "*".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Crontab {
    pub minute: String,
    pub hour: String,
    pub day_of_week: String,
    pub day_of_month: String,
    pub month_of_year: String,
}

impl Default for Crontab {
    fn default() -> Self {
        Self {
            minute: "*".into(),
            hour: "*".into(),
            day_of_week: "*".into(),
            day_of_month: "*".into(),
            month_of_year: "*".into(),
        }
    }
}

impl fmt::Display for Crontab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month_of_year, self.day_of_week
        )
    }
}

/// Global time limits outside the per-task annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    #[serde(with = "duration")]
    pub sqllab_async_time_limit: Duration,
    #[serde(with = "duration")]
    pub webserver_timeout: Duration,
    #[serde(with = "duration")]
    pub celeryd_task_time_limit: Duration,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            sqllab_async_time_limit: Duration::from_secs(60 * 60),
            webserver_timeout: Duration::from_secs(60 * 10),
            celeryd_task_time_limit: Duration::from_secs(60 * 10),
        }
    }
}
