//! Teacher schedule - availability scheduling engine
//!
//! Turns a teacher's raw availability and booking windows into fixed-length,
//! timezone-correct interval slots, and lets a front end page through them by
//! week and filter them by day.

pub mod config;
pub mod schedule;

pub use config::Config;
pub use schedule::{ScheduleController, ScheduleStore};
