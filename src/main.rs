//! Teacher schedule - command line viewer
//!
//! Usage: `teacher-schedule [TEACHER_ID] [next|prev]...`
//!
//! Fetches the teacher's availability for the current week (optionally paging
//! forward or back first) and prints every day tab's slots.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use teacher_schedule::schedule::{
    slots_by_part_of_day, HttpAvailabilitySource, LoadState, ScheduleController, ScheduleStore,
    SlotExpander, SystemClock, TimeZoneConverter,
};
use teacher_schedule::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

enum Step {
    Next,
    Prev,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    if std::path::Path::new(".env").exists() {
        dotenvy::dotenv()?;
        info!("Loaded environment variables from .env file");
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;
    info!("Configuration loaded");
    info!("Availability source: {}", config.source.base_url);
    info!(
        "Slot interval: {} minutes ({:?} trailing slots)",
        config.schedule.interval_minutes, config.schedule.trailing_slot
    );

    let mut teacher_id = config.schedule.teacher_id.clone();
    let mut steps = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "next" => steps.push(Step::Next),
            "prev" => steps.push(Step::Prev),
            _ => teacher_id = Some(arg),
        }
    }
    let teacher_id = teacher_id
        .context("No teacher given: pass one as an argument or set schedule.teacher_id")?;

    let converter = TimeZoneConverter::new(config.schedule.local_zone()?);
    let expander = SlotExpander::new(
        config.schedule.interval_minutes,
        config.schedule.trailing_slot,
        converter,
    );
    let source = Arc::new(HttpAvailabilitySource::new(&config.source)?);
    let controller = ScheduleController::new(
        ScheduleStore::new(source, expander),
        converter,
        Arc::new(SystemClock),
    );

    controller.initialize(&teacher_id).await;
    for step in steps {
        match step {
            Step::Next => controller.next_week().await,
            Step::Prev => controller.previous_week().await,
        };
    }

    let week = controller.week();
    if let LoadState::Error(e) = controller.store().slots() {
        bail!("Could not load schedule for {}: {}", teacher_id, e);
    }

    println!("{} - week of {}", teacher_id, week.window.display_label);
    for day in &week.days {
        controller.select_day(Some(*day));
        let LoadState::Success(slots) = controller.filtered_view() else {
            continue;
        };

        println!();
        println!("{}", day.format("%a %Y-%m-%d"));
        let sections = slots_by_part_of_day(&slots);
        if sections.is_empty() {
            println!("  no slots");
        }
        for (part, slots) in sections.iter() {
            println!("  {}", part.label());
            for slot in slots {
                println!("    {}  {}", slot.time_label(), slot.state.label());
            }
        }
    }

    Ok(())
}
