//! # Breath Core Library
//!
//! Core logic for a breath-training app: a guided exercise timer, persisted
//! practice records with daily goals, and statistics over that history. The
//! CLI binary is a thin shell over this crate.
//!
//! ## Architecture
//!
//! - **Exercise engine**: a tick-driven phase state machine; the caller
//!   invokes `advance()` with elapsed seconds and reacts to returned events
//! - **Stopwatches**: free-form hold/exhale timing that ends in a record
//! - **Storage**: JSON documents in SQLite plus a TOML configuration file
//! - **Stats**: pure aggregations over any subset of records
//! - **Reminders**: a planner for local notification triggers
//!
//! ## Key Components
//!
//! - [`ExercisePhaseEngine`]: guided session state machine
//! - [`RecordStore`]: records, daily tasks and the exercise configuration
//! - [`StatsAggregator`]: totals, averages and bests
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod logging;
pub mod record;
pub mod reminders;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::{Cue, Event};
pub use record::{BreathRecord, BreathType, ScoreLevel};
pub use reminders::{ReminderFrequency, ReminderSettings, ReminderTime, ReminderTrigger};
pub use stats::{BestScore, DayGroup, StatsAggregator, StatsSummary, Timeframe, TypeAverage};
pub use storage::{
    data_dir, Config, Database, DocumentBackend, LoggingConfig, RecordStore, SharedRecordStore,
};
pub use task::DailyTask;
pub use timer::{
    BreathStopwatch, ExerciseConfig, ExercisePhase, ExercisePhaseEngine, StopwatchKind,
};
