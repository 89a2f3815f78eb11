//! Previous/next week arithmetic on the local calendar
//!
//! Stepping happens on dates only. The caller turns the resulting Monday back
//! into an instant through the local zone, so an offset change between the two
//! weeks never moves the target onto a different day.

use chrono::{Duration, NaiveDate};

/// Where a week step lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekTarget {
    /// The week starting on this Monday, shown in full
    Monday(NaiveDate),
    /// The current week, shown from today
    Now,
}

/// One week back, but never earlier than the week containing `today`
///
/// Once the candidate Monday is on or before today the target snaps to
/// [`WeekTarget::Now`], so the current week is shown from today onwards.
pub fn previous_week(current_monday: NaiveDate, today: NaiveDate) -> WeekTarget {
    let candidate = current_monday - Duration::weeks(1);
    if candidate <= today {
        WeekTarget::Now
    } else {
        WeekTarget::Monday(candidate)
    }
}

/// One week forward; no upper bound
pub fn next_week(current_monday: NaiveDate) -> NaiveDate {
    current_monday + Duration::weeks(1)
}
