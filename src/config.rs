//! Configuration management for the schedule engine

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::schedule::{LocalZone, TrailingSlotPolicy};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Where availability is fetched from
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.amazingtalker.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Teacher shown when none is given on the command line
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    #[serde(default)]
    pub trailing_slot: TrailingSlotPolicy,
    /// IANA zone name; the system zone when unset
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            teacher_id: None,
            interval_minutes: default_interval_minutes(),
            trailing_slot: TrailingSlotPolicy::default(),
            timezone: None,
        }
    }
}

fn default_interval_minutes() -> u32 {
    30
}

impl ScheduleConfig {
    pub fn local_zone(&self) -> Result<LocalZone> {
        LocalZone::parse(self.timezone.as_deref()).map_err(anyhow::Error::msg)
    }
}

impl Config {
    /// Load configuration from teacher-schedule.toml
    pub fn load() -> Result<Self> {
        Self::load_from("teacher-schedule.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Try to load from file first
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;

            let mut config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?;

            config.expand_env_vars();
            config.validate()?;
            return Ok(config);
        }

        // Fall back to environment variables only
        Self::from_env()
    }

    /// Load configuration entirely from environment variables
    pub fn from_env() -> Result<Self> {
        let trailing_slot = match std::env::var("SCHEDULE_TRAILING_SLOT") {
            Ok(value) => TrailingSlotPolicy::from_str(&value)
                .with_context(|| format!("Unknown SCHEDULE_TRAILING_SLOT: {}", value))?,
            Err(_) => TrailingSlotPolicy::default(),
        };

        let config = Config {
            source: SourceConfig {
                base_url: std::env::var("SCHEDULE_SOURCE_URL").unwrap_or_else(|_| default_base_url()),
                timeout_secs: std::env::var("SCHEDULE_SOURCE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_timeout_secs),
            },
            schedule: ScheduleConfig {
                teacher_id: std::env::var("SCHEDULE_TEACHER_ID").ok(),
                interval_minutes: match std::env::var("SCHEDULE_INTERVAL_MINUTES") {
                    Ok(value) => value
                        .parse()
                        .with_context(|| format!("Invalid SCHEDULE_INTERVAL_MINUTES: {}", value))?,
                    Err(_) => default_interval_minutes(),
                },
                trailing_slot,
                timezone: std::env::var("SCHEDULE_TIMEZONE").ok(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.schedule.interval_minutes > 0,
            "schedule.interval_minutes must be greater than zero"
        );
        ensure!(self.source.timeout_secs > 0, "source.timeout_secs must be greater than zero");
        self.schedule.local_zone()?;
        Ok(())
    }

    /// Expand ${VAR} patterns in string fields
    fn expand_env_vars(&mut self) {
        self.source.base_url = expand_env(&self.source.base_url);
        if let Some(ref mut teacher) = self.schedule.teacher_id {
            *teacher = expand_env(teacher);
        }
        if let Some(ref mut tz) = self.schedule.timezone {
            *tz = expand_env(tz);
        }
    }
}

/// Expand ${VAR} patterns in a string
fn expand_env(s: &str) -> String {
    let mut result = s.to_string();

    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let replacement = std::env::var(var_name).unwrap_or_default();
            result = format!("{}{}{}", &result[..start], replacement, &result[start + end + 1..]);
        } else {
            break;
        }
    }

    result
}
