//! Schedule data model: slots, raw windows and load state

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::source::SourceError;

/// Whether a slot is open for booking or already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleState {
    Available,
    Booked,
}

impl ScheduleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleState::Available => "available",
            ScheduleState::Booked => "booked",
        }
    }

    /// Get a human-readable state label
    pub fn label(&self) -> &'static str {
        match self {
            ScheduleState::Available => "Available",
            ScheduleState::Booked => "Booked",
        }
    }
}

/// Coarse section of the local day a slot starts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfDay {
    /// 00:00 to 11:59
    Morning,
    /// 12:00 to 17:59
    Afternoon,
    /// 18:00 to 23:59
    Evening,
}

impl PartOfDay {
    /// Classify a local hour (0-23)
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=11 => PartOfDay::Morning,
            12..=17 => PartOfDay::Afternoon,
            _ => PartOfDay::Evening,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfDay::Morning => "morning",
            PartOfDay::Afternoon => "afternoon",
            PartOfDay::Evening => "evening",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PartOfDay::Morning => "Morning",
            PartOfDay::Afternoon => "Afternoon",
            PartOfDay::Evening => "Evening",
        }
    }
}

/// A single interval slot in the viewer's local offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub state: ScheduleState,
    pub part_of_day: Option<PartOfDay>,
}

impl TimeSlot {
    /// Create a slot, classifying its part of day from the local start hour
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>, state: ScheduleState) -> Self {
        Self {
            start,
            end,
            state,
            part_of_day: Some(PartOfDay::from_hour(start.hour())),
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Local calendar day the slot starts on
    pub fn local_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// "HH:MM - HH:MM" in local time
    pub fn time_label(&self) -> String {
        format!("{} - {}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Raw availability or booking range as returned by the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AvailabilityWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Zero-length and inverted windows produce no slots
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Both window lists for one teacher and query instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherAvailability {
    #[serde(default)]
    pub available: Vec<AvailabilityWindow>,
    #[serde(default)]
    pub booked: Vec<AvailabilityWindow>,
}

/// Local calendar day used to filter the view; `None` until a tab is picked
pub type SelectedDay = Option<NaiveDate>;

/// Asynchronous load state wrapping a value end-to-end
#[derive(Debug, Clone)]
pub enum LoadState<T> {
    Loading,
    Success(T),
    Error(Arc<SourceError>),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            LoadState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SourceError> {
        match self {
            LoadState::Error(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Transform the success value, passing `Loading` and `Error` through
    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> LoadState<U> {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Success(value) => LoadState::Success(f(value)),
            LoadState::Error(err) => LoadState::Error(Arc::clone(err)),
        }
    }
}

impl<T: PartialEq> PartialEq for LoadState<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LoadState::Loading, LoadState::Loading) => true,
            (LoadState::Success(a), LoadState::Success(b)) => a == b,
            (LoadState::Error(a), LoadState::Error(b)) => Arc::ptr_eq(a, b) || a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// Slots of one day split into morning, afternoon and evening sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySections {
    pub morning: Vec<TimeSlot>,
    pub afternoon: Vec<TimeSlot>,
    pub evening: Vec<TimeSlot>,
}

impl DaySections {
    pub fn is_empty(&self) -> bool {
        self.morning.is_empty() && self.afternoon.is_empty() && self.evening.is_empty()
    }

    /// Non-empty sections in display order
    pub fn iter(&self) -> impl Iterator<Item = (PartOfDay, &[TimeSlot])> {
        [
            (PartOfDay::Morning, self.morning.as_slice()),
            (PartOfDay::Afternoon, self.afternoon.as_slice()),
            (PartOfDay::Evening, self.evening.as_slice()),
        ]
        .into_iter()
        .filter(|(_, slots)| !slots.is_empty())
    }
}

/// Group a day view by part of day, keeping the original order inside each section
pub fn slots_by_part_of_day(slots: &[TimeSlot]) -> DaySections {
    let mut sections = DaySections::default();
    for slot in slots {
        let part = slot
            .part_of_day
            .unwrap_or_else(|| PartOfDay::from_hour(slot.start.hour()));
        match part {
            PartOfDay::Morning => sections.morning.push(slot.clone()),
            PartOfDay::Afternoon => sections.afternoon.push(slot.clone()),
            PartOfDay::Evening => sections.evening.push(slot.clone()),
        }
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 4, h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_part_of_day_boundaries() {
        assert_eq!(PartOfDay::from_hour(0), PartOfDay::Morning);
        assert_eq!(PartOfDay::from_hour(11), PartOfDay::Morning);
        assert_eq!(PartOfDay::from_hour(12), PartOfDay::Afternoon);
        assert_eq!(PartOfDay::from_hour(17), PartOfDay::Afternoon);
        assert_eq!(PartOfDay::from_hour(18), PartOfDay::Evening);
        assert_eq!(PartOfDay::from_hour(23), PartOfDay::Evening);
    }

    #[test]
    fn test_slot_classifies_local_start() {
        let slot = TimeSlot::new(local(17, 30), local(18, 0), ScheduleState::Booked);
        assert_eq!(slot.part_of_day, Some(PartOfDay::Afternoon));
        assert_eq!(slot.duration(), Duration::minutes(30));
        assert_eq!(slot.time_label(), "17:30 - 18:00");
        assert_eq!(slot.local_date(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn test_window_empty() {
        let t = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        assert!(AvailabilityWindow::new(t, t).is_empty());
        assert!(AvailabilityWindow::new(t, t - Duration::minutes(1)).is_empty());
        assert!(!AvailabilityWindow::new(t, t + Duration::minutes(1)).is_empty());
    }

    #[test]
    fn test_availability_deserializes_wire_shape() {
        let json = r#"{
            "available": [{"start": "2024-03-04T00:00:00Z", "end": "2024-03-04T02:00:00Z"}]
        }"#;
        let parsed: TeacherAvailability = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.available.len(), 1);
        assert!(parsed.booked.is_empty());
        assert_eq!(
            parsed.available[0].end,
            Utc.with_ymd_and_hms(2024, 3, 4, 2, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_load_state_map_passes_through() {
        let loading: LoadState<Vec<u8>> = LoadState::Loading;
        assert!(loading.map(|v| v.len()).is_loading());

        let ok = LoadState::Success(vec![1u8, 2, 3]);
        assert_eq!(ok.map(|v| v.len()), LoadState::Success(3));

        let err: LoadState<Vec<u8>> = LoadState::Error(Arc::new(SourceError::Status {
            status: 500,
            body: "boom".to_string(),
        }));
        assert!(err.map(|v| v.len()).error().is_some());
    }

    #[test]
    fn test_sections_keep_order() {
        let slots = vec![
            TimeSlot::new(local(9, 0), local(9, 30), ScheduleState::Available),
            TimeSlot::new(local(9, 30), local(10, 0), ScheduleState::Booked),
            TimeSlot::new(local(19, 0), local(19, 30), ScheduleState::Available),
        ];
        let sections = slots_by_part_of_day(&slots);
        assert_eq!(sections.morning, slots[..2].to_vec());
        assert!(sections.afternoon.is_empty());
        assert_eq!(sections.evening, slots[2..].to_vec());

        let parts: Vec<PartOfDay> = sections.iter().map(|(part, _)| part).collect();
        assert_eq!(parts, vec![PartOfDay::Morning, PartOfDay::Evening]);
    }
}
