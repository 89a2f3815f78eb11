//! Teacher availability scheduling engine

mod controller;
mod expander;
mod models;
pub mod navigator;
mod source;
mod store;
mod timezone;
pub mod week;

pub use controller::{ScheduleController, WeekView};
pub use expander::{merge, SlotExpander, TrailingSlotPolicy};
pub use models::*;
pub use source::{started_at_param, AvailabilitySource, HttpAvailabilitySource, SourceError};
pub use store::{LoadOutcome, ScheduleStore, StoreSnapshot};
pub use timezone::{Clock, LocalZone, SystemClock, TimeZoneConverter};
pub use week::WeekWindow;
