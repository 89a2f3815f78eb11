//! Decomposes raw availability windows into fixed-length interval slots

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::models::{AvailabilityWindow, ScheduleState, TimeSlot};
use super::timezone::TimeZoneConverter;

/// What to do with the remainder when a window is not a multiple of the interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingSlotPolicy {
    /// Only full-length slots are emitted
    #[default]
    Drop,
    /// Keep the remainder as a shorter final slot ending at the window end
    Clamp,
}

impl TrailingSlotPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Some(TrailingSlotPolicy::Drop),
            "clamp" => Some(TrailingSlotPolicy::Clamp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SlotExpander {
    interval: Duration,
    trailing: TrailingSlotPolicy,
    converter: TimeZoneConverter,
}

impl SlotExpander {
    pub fn new(interval_minutes: u32, trailing: TrailingSlotPolicy, converter: TimeZoneConverter) -> Self {
        Self {
            interval: Duration::minutes(i64::from(interval_minutes)),
            trailing,
            converter,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Split one window into consecutive `[cursor, cursor + interval)` slots
    pub fn expand(&self, window: &AvailabilityWindow, state: ScheduleState) -> Vec<TimeSlot> {
        if window.is_empty() || self.interval <= Duration::zero() {
            return Vec::new();
        }

        let mut slots = Vec::new();
        let mut cursor = window.start;
        while cursor < window.end {
            let next = cursor + self.interval;
            let end = if next <= window.end {
                next
            } else {
                match self.trailing {
                    TrailingSlotPolicy::Drop => break,
                    TrailingSlotPolicy::Clamp => window.end,
                }
            };
            slots.push(TimeSlot::new(
                self.converter.to_local(cursor),
                self.converter.to_local(end),
                state,
            ));
            cursor = next;
        }
        slots
    }

    pub fn expand_all(&self, windows: &[AvailabilityWindow], state: ScheduleState) -> Vec<TimeSlot> {
        windows
            .iter()
            .flat_map(|window| self.expand(window, state))
            .collect()
    }
}

/// Combine available and booked slots into one list ordered by start
pub fn merge(mut available: Vec<TimeSlot>, booked: Vec<TimeSlot>) -> Vec<TimeSlot> {
    available.extend(booked);
    available.sort_by_key(|slot| slot.start);
    available
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::timezone::LocalZone;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn utc(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap()
    }

    fn expander(policy: TrailingSlotPolicy) -> SlotExpander {
        SlotExpander::new(30, policy, TimeZoneConverter::new(LocalZone::Named(chrono_tz::UTC)))
    }

    #[test]
    fn test_two_hour_window_gives_four_slots() {
        let window = AvailabilityWindow::new(utc(4, 0, 0), utc(4, 2, 0));
        let slots = expander(TrailingSlotPolicy::Drop).expand(&window, ScheduleState::Available);

        let labels: Vec<String> = slots.iter().map(TimeSlot::time_label).collect();
        assert_eq!(
            labels,
            vec!["00:00 - 00:30", "00:30 - 01:00", "01:00 - 01:30", "01:30 - 02:00"]
        );
        assert!(slots.iter().all(|s| s.state == ScheduleState::Available));
    }

    #[test]
    fn test_slots_are_contiguous_full_length() {
        let e = expander(TrailingSlotPolicy::Drop);
        for minutes in [1i64, 29, 30, 31, 59, 60, 95, 600, 1441] {
            let window = AvailabilityWindow::new(utc(4, 6, 0), utc(4, 6, 0) + Duration::minutes(minutes));
            let slots = e.expand(&window, ScheduleState::Booked);
            assert_eq!(slots.len() as i64, minutes / 30, "window of {} minutes", minutes);
            if let Some(first) = slots.first() {
                assert_eq!(first.start, window.start);
            }
            for slot in &slots {
                assert_eq!(slot.duration(), Duration::minutes(30));
            }
            for pair in slots.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
        }
    }

    #[test]
    fn test_empty_and_inverted_windows() {
        let e = expander(TrailingSlotPolicy::Clamp);
        let zero = AvailabilityWindow::new(utc(4, 1, 0), utc(4, 1, 0));
        let inverted = AvailabilityWindow::new(utc(4, 2, 0), utc(4, 1, 0));
        assert!(e.expand(&zero, ScheduleState::Available).is_empty());
        assert!(e.expand(&inverted, ScheduleState::Available).is_empty());
    }

    #[test]
    fn test_zero_interval_is_empty() {
        let e = SlotExpander::new(0, TrailingSlotPolicy::Drop, TimeZoneConverter::default());
        let window = AvailabilityWindow::new(utc(4, 0, 0), utc(4, 2, 0));
        assert!(e.expand(&window, ScheduleState::Available).is_empty());
    }

    #[test]
    fn test_trailing_remainder_policies() {
        let window = AvailabilityWindow::new(utc(4, 0, 0), utc(4, 1, 10));

        let dropped = expander(TrailingSlotPolicy::Drop).expand(&window, ScheduleState::Available);
        assert_eq!(dropped.len(), 2);
        assert_eq!(dropped[1].end, utc(4, 1, 0));

        let clamped = expander(TrailingSlotPolicy::Clamp).expand(&window, ScheduleState::Available);
        assert_eq!(clamped.len(), 3);
        assert_eq!(clamped[2].start, utc(4, 1, 0));
        assert_eq!(clamped[2].end, utc(4, 1, 10));
        assert_eq!(clamped[2].duration(), Duration::minutes(10));
    }

    #[test]
    fn test_slots_carry_local_offset() {
        let e = SlotExpander::new(
            30,
            TrailingSlotPolicy::Drop,
            TimeZoneConverter::new(LocalZone::Named(chrono_tz::Asia::Taipei)),
        );
        let window = AvailabilityWindow::new(utc(4, 9, 0), utc(4, 10, 0));
        let slots = e.expand(&window, ScheduleState::Available);
        assert_eq!(slots[0].start.format("%Y-%m-%d %H:%M").to_string(), "2024-03-04 17:00");
        assert_eq!(slots[0].part_of_day, Some(crate::schedule::PartOfDay::Afternoon));
        assert_eq!(slots[1].part_of_day, Some(crate::schedule::PartOfDay::Afternoon));
    }

    #[test]
    fn test_merge_interleaves_by_start() {
        let e = expander(TrailingSlotPolicy::Drop);
        let available = e.expand_all(
            &[
                AvailabilityWindow::new(utc(4, 3, 0), utc(4, 4, 0)),
                AvailabilityWindow::new(utc(4, 0, 0), utc(4, 1, 0)),
            ],
            ScheduleState::Available,
        );
        let booked = e.expand_all(
            &[AvailabilityWindow::new(utc(4, 1, 0), utc(4, 3, 0))],
            ScheduleState::Booked,
        );

        let merged = merge(available, booked);
        assert_eq!(merged.len(), 8);
        for pair in merged.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
        let states: Vec<ScheduleState> = merged.iter().map(|s| s.state).collect();
        use ScheduleState::{Available as A, Booked as B};
        assert_eq!(states, vec![A, A, B, B, B, B, A, A]);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(TrailingSlotPolicy::from_str("Drop"), Some(TrailingSlotPolicy::Drop));
        assert_eq!(TrailingSlotPolicy::from_str(" clamp "), Some(TrailingSlotPolicy::Clamp));
        assert_eq!(TrailingSlotPolicy::from_str("truncate"), None);
    }
}
