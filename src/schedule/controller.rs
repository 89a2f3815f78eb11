//! Inbound command surface for the presentation layer
//!
//! Wires week navigation to the store: every navigation re-derives the whole
//! [`WeekView`] from one anchor instant, publishes it, then reloads the store.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{info, warn};

use super::models::{LoadState, SelectedDay, TimeSlot};
use super::navigator::{self, WeekTarget};
use super::store::{LoadOutcome, ScheduleStore, StoreSnapshot};
use super::timezone::{Clock, TimeZoneConverter};
use super::week::{day_list, WeekWindow};

/// Week currently on screen, always derived in one step from `anchor`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekView {
    /// Local instant the week was derived from
    pub anchor: DateTime<FixedOffset>,
    /// `anchor` in UTC, sent to the availability source
    pub started_at: DateTime<Utc>,
    pub window: WeekWindow,
    /// Day tabs from the anchor's date through Sunday
    pub days: Vec<NaiveDate>,
}

impl WeekView {
    pub fn derive(started_at: DateTime<Utc>, converter: &TimeZoneConverter) -> Self {
        let anchor = converter.to_local(started_at);
        let window = WeekWindow::for_instant(anchor);
        let days = day_list(anchor, window.sunday_local);
        Self {
            anchor,
            started_at,
            window,
            days,
        }
    }

    /// Monday of this week at the anchor's wall-clock time
    pub fn monday_anchor(&self) -> NaiveDateTime {
        self.window.monday_local.and_time(self.anchor.time())
    }
}

pub struct ScheduleController {
    store: ScheduleStore,
    converter: TimeZoneConverter,
    clock: Arc<dyn Clock>,
    teacher_id: Mutex<Option<String>>,
    week: watch::Sender<WeekView>,
}

impl ScheduleController {
    /// Starts on the current week; nothing is fetched until [`initialize`](Self::initialize)
    pub fn new(store: ScheduleStore, converter: TimeZoneConverter, clock: Arc<dyn Clock>) -> Self {
        let (week, _) = watch::channel(WeekView::derive(clock.now_utc(), &converter));
        Self {
            store,
            converter,
            clock,
            teacher_id: Mutex::new(None),
            week,
        }
    }

    /// Show `teacher_id`'s schedule from the current week
    pub async fn initialize(&self, teacher_id: &str) -> LoadOutcome {
        *self.teacher_id.lock() = Some(teacher_id.to_string());
        let now = self.converter.to_local(self.clock.now_utc());
        self.navigate_to(now).await
    }

    pub async fn previous_week(&self) -> LoadOutcome {
        let now = self.converter.to_local(self.clock.now_utc());
        let monday = self.week.borrow().monday_anchor();
        let anchor = match navigator::previous_week(monday.date(), now.date_naive()) {
            WeekTarget::Monday(previous) => self.converter.resolve_local(previous.and_time(monday.time())),
            WeekTarget::Now => now,
        };
        self.navigate_to(anchor).await
    }

    pub async fn next_week(&self) -> LoadOutcome {
        let monday = self.week.borrow().monday_anchor();
        let next = navigator::next_week(monday.date());
        self.navigate_to(self.converter.resolve_local(next.and_time(monday.time())))
            .await
    }

    pub fn select_day(&self, day: SelectedDay) {
        self.store.select_day(day);
    }

    pub fn week(&self) -> WeekView {
        self.week.borrow().clone()
    }

    pub fn filtered_view(&self) -> LoadState<Vec<TimeSlot>> {
        self.store.filtered_view()
    }

    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    pub fn teacher_id(&self) -> Option<String> {
        self.teacher_id.lock().clone()
    }

    pub fn subscribe_week(&self) -> watch::Receiver<WeekView> {
        self.week.subscribe()
    }

    pub fn subscribe_view(&self) -> watch::Receiver<StoreSnapshot> {
        self.store.subscribe()
    }

    async fn navigate_to(&self, anchor: DateTime<FixedOffset>) -> LoadOutcome {
        let view = WeekView::derive(self.converter.to_utc(anchor), &self.converter);
        let started_at = view.started_at;
        info!("Showing week {}", view.window.display_label);
        self.week.send_replace(view);

        let Some(teacher_id) = self.teacher_id() else {
            warn!("No teacher selected, skipping schedule load");
            return LoadOutcome::Skipped;
        };
        self.store.load(&teacher_id, started_at).await
    }
}
