pub mod config;
pub mod exercise;
pub mod history;
pub mod reminders;
pub mod reset;
pub mod stats;
pub mod stopwatch;
pub mod tasks;

use breath_core::{Event, RecordStore};
use chrono::{Local, Utc};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the default store with today's tasks in place.
pub fn open_store() -> Result<RecordStore, Box<dyn std::error::Error>> {
    let mut store = RecordStore::open()?;
    store.ensure_daily_tasks(Local::now().date_naive());
    Ok(store)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Persist every finished record in `events`, returning a `RecordAdded`
/// event for each.
pub fn store_finished(store: &mut RecordStore, events: &[Event]) -> Vec<Event> {
    events
        .iter()
        .filter_map(Event::finished_record)
        .map(|record| {
            let task = store.add_record(record.clone());
            Event::RecordAdded {
                record: record.clone(),
                task,
                at: Utc::now(),
            }
        })
        .collect()
}
