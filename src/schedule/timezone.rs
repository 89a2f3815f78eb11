//! UTC <-> local offset conversion and the clock the engine reads "now" from

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Zone the viewer's local calendar is computed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalZone {
    /// The host's own zone
    #[default]
    System,
    /// An explicit IANA zone
    Named(Tz),
}

impl LocalZone {
    /// Parse an optional IANA name; `None` means the system zone
    pub fn parse(name: Option<&str>) -> Result<Self, String> {
        match name.map(str::trim) {
            None | Some("") => Ok(LocalZone::System),
            Some(name) => name
                .parse::<Tz>()
                .map(LocalZone::Named)
                .map_err(|_| format!("Unknown timezone: {}", name)),
        }
    }
}

/// Converts instants between UTC and the viewer's local offset
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeZoneConverter {
    zone: LocalZone,
}

impl TimeZoneConverter {
    pub fn new(zone: LocalZone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> LocalZone {
        self.zone
    }

    /// Apply the local offset in effect at `instant`
    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self.zone {
            LocalZone::System => instant.with_timezone(&Local).fixed_offset(),
            LocalZone::Named(tz) => instant.with_timezone(&tz).fixed_offset(),
        }
    }

    pub fn to_utc(&self, instant: DateTime<FixedOffset>) -> DateTime<Utc> {
        instant.with_timezone(&Utc)
    }

    /// Attach the zone's offset to a wall-clock time on the local calendar
    ///
    /// Ambiguous times (fall-back) take the earlier instant. Times skipped by a
    /// spring-forward move past the gap.
    pub fn resolve_local(&self, local: NaiveDateTime) -> DateTime<FixedOffset> {
        self.earliest(local)
            .or_else(|| self.earliest(local + Duration::hours(1)))
            .unwrap_or_else(|| self.to_local(Utc.from_utc_datetime(&local)))
    }

    fn earliest(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self.zone {
            LocalZone::System => Local.from_local_datetime(&local).earliest().map(|dt| dt.fixed_offset()),
            LocalZone::Named(tz) => tz.from_local_datetime(&local).earliest().map(|dt| dt.fixed_offset()),
        }
    }
}

/// Source of the real-world current instant
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
