//! Schedule store - slot collection, day selection and the derived day view
//!
//! All mutable state sits behind one mutex that is only held while a state
//! transition is applied, never across the availability fetch. Every load
//! takes a new generation number; a fetch that completes after a newer load
//! has started is discarded, so the last call always wins.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::expander::{merge, SlotExpander};
use super::models::{LoadState, ScheduleState, SelectedDay, TimeSlot};
use super::source::AvailabilitySource;

/// What the presentation layer observes after each transition
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub selected_day: SelectedDay,
    pub view: LoadState<Vec<TimeSlot>>,
}

/// Whether a finished load was reflected in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load started while this one was in flight
    Superseded,
    /// Nothing to load yet
    Skipped,
}

struct StoreState {
    generation: u64,
    slots: LoadState<Vec<TimeSlot>>,
    selected_day: SelectedDay,
}

impl StoreState {
    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            selected_day: self.selected_day,
            view: filter_view(&self.slots, self.selected_day),
        }
    }
}

pub struct ScheduleStore {
    source: Arc<dyn AvailabilitySource>,
    expander: SlotExpander,
    state: Mutex<StoreState>,
    snapshots: watch::Sender<StoreSnapshot>,
}

impl ScheduleStore {
    pub fn new(source: Arc<dyn AvailabilitySource>, expander: SlotExpander) -> Self {
        let state = StoreState {
            generation: 0,
            slots: LoadState::Loading,
            selected_day: None,
        };
        let (snapshots, _) = watch::channel(state.snapshot());
        Self {
            source,
            expander,
            state: Mutex::new(state),
            snapshots,
        }
    }

    /// Fetch and expand a teacher's schedule starting at `started_at`
    pub async fn load(&self, teacher_id: &str, started_at: DateTime<Utc>) -> LoadOutcome {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.slots = LoadState::Loading;
            self.publish(&state);
            state.generation
        };

        info!("Loading schedule for {} from {} (load #{})", teacher_id, started_at, generation);

        let slots = match self.source.fetch_availability(teacher_id, started_at).await {
            Ok(availability) => {
                let available = self
                    .expander
                    .expand_all(&availability.available, ScheduleState::Available);
                let booked = self
                    .expander
                    .expand_all(&availability.booked, ScheduleState::Booked);
                LoadState::Success(merge(available, booked))
            }
            Err(e) => LoadState::Error(Arc::new(e)),
        };

        let mut state = self.state.lock();
        if state.generation != generation {
            debug!(
                "Discarding stale schedule for {} (load #{}, current #{})",
                teacher_id, generation, state.generation
            );
            return LoadOutcome::Superseded;
        }

        match &slots {
            LoadState::Success(slots) => info!("Schedule for {} loaded: {} slots", teacher_id, slots.len()),
            LoadState::Error(e) => warn!("Schedule for {} failed to load: {}", teacher_id, e),
            LoadState::Loading => {}
        }

        state.slots = slots;
        self.publish(&state);
        LoadOutcome::Applied
    }

    /// Change the day tab; never re-fetches
    pub fn select_day(&self, day: SelectedDay) {
        let mut state = self.state.lock();
        state.selected_day = day;
        self.publish(&state);
    }

    pub fn selected_day(&self) -> SelectedDay {
        self.state.lock().selected_day
    }

    /// Slots of the selected day, or nothing until a day is picked
    pub fn filtered_view(&self) -> LoadState<Vec<TimeSlot>> {
        let state = self.state.lock();
        filter_view(&state.slots, state.selected_day)
    }

    /// The whole loaded collection, unfiltered
    pub fn slots(&self) -> LoadState<Vec<TimeSlot>> {
        self.state.lock().slots.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.snapshots.subscribe()
    }

    fn publish(&self, state: &StoreState) {
        self.snapshots.send_replace(state.snapshot());
    }
}

fn filter_view(slots: &LoadState<Vec<TimeSlot>>, selected_day: SelectedDay) -> LoadState<Vec<TimeSlot>> {
    slots.map(|slots| match selected_day {
        Some(day) => slots
            .iter()
            .filter(|slot| slot.local_date() == day)
            .cloned()
            .collect(),
        None => Vec::new(),
    })
}
