//! Availability source - the only I/O the engine performs
//!
//! The engine sees a teacher's schedule through [`AvailabilitySource`]. The
//! HTTP implementation talks to the public guest schedule endpoint; tests plug
//! in their own sources.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, DurationRound, SecondsFormat, Utc};
use reqwest::Url;
use tracing::debug;

use super::models::TeacherAvailability;
use crate::config::SourceConfig;

/// Failure fetching or decoding a teacher's availability
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("invalid source url: {0}")]
    InvalidUrl(String),

    #[error("availability request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("availability request returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode availability response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("availability source unavailable: {0}")]
    Upstream(String),
}

/// Fetches raw availability and booking windows for a teacher
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    async fn fetch_availability(
        &self,
        teacher_id: &str,
        started_at: DateTime<Utc>,
    ) -> Result<TeacherAvailability, SourceError>;
}

/// Availability source backed by the guest schedule HTTP API
pub struct HttpAvailabilitySource {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpAvailabilitySource {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SourceError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl(config.base_url.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { base_url, client })
    }

    /// `{base}/v1/guest/teachers/{teacher_id}/schedule`
    fn schedule_url(&self, teacher_id: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["v1", "guest", "teachers", teacher_id, "schedule"]);
        Ok(url)
    }
}

/// Query parameter form of the start instant, truncated to whole seconds
pub fn started_at_param(started_at: DateTime<Utc>) -> String {
    started_at
        .duration_trunc(chrono::Duration::seconds(1))
        .unwrap_or(started_at)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[async_trait]
impl AvailabilitySource for HttpAvailabilitySource {
    async fn fetch_availability(
        &self,
        teacher_id: &str,
        started_at: DateTime<Utc>,
    ) -> Result<TeacherAvailability, SourceError> {
        let url = self.schedule_url(teacher_id)?;
        let started_at = started_at_param(started_at);

        debug!("Fetching availability for {} from {}", teacher_id, started_at);

        let response = self
            .client
            .get(url)
            .query(&[("started_at", started_at.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body });
        }

        let body = response.text().await?;
        let availability: TeacherAvailability = serde_json::from_str(&body)?;

        debug!(
            "Teacher {} has {} available and {} booked windows",
            teacher_id,
            availability.available.len(),
            availability.booked.len()
        );

        Ok(availability)
    }
}
