//! Week boundaries and day tabs computed on the local calendar

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate};
use serde::Serialize;

/// Monday-to-Sunday local boundaries of the week being viewed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    pub monday_local: NaiveDate,
    pub sunday_local: NaiveDate,
    pub display_label: String,
}

impl WeekWindow {
    /// Week containing the local date of `local`
    pub fn for_instant(local: DateTime<FixedOffset>) -> Self {
        Self::for_date(local.date_naive())
    }

    pub fn for_date(date: NaiveDate) -> Self {
        let monday_local = start_of_week(date);
        let sunday_local = end_of_week(date);
        let display_label = format!(
            "{} - {}",
            monday_local.format("%Y-%m-%d"),
            sunday_local.format("%m-%d")
        );
        Self {
            monday_local,
            sunday_local,
            display_label,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.monday_local <= date && date <= self.sunday_local
    }
}

/// Monday on or before `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Sunday on or after `date`
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    date + Duration::days(6 - i64::from(date.weekday().num_days_from_monday()))
}

/// Day tabs from `local`'s date through `sunday` inclusive
pub fn day_list(local: DateTime<FixedOffset>, sunday: NaiveDate) -> Vec<NaiveDate> {
    local
        .date_naive()
        .iter_days()
        .take_while(|day| *day <= sunday)
        .collect()
}
