use std::time::Duration;

use breath_core::storage::Database;
use breath_core::{Event, ExerciseConfig, ExercisePhase, ExercisePhaseEngine};
use clap::Subcommand;
use tracing::debug;

use super::{open_store, print_json, store_finished, CliResult};

pub const ENGINE_KEY: &str = "exercise_engine";

/// Tick length for `exercise run`.
const TICK: Duration = Duration::from_millis(100);

#[derive(Subcommand)]
pub enum ExerciseAction {
    /// Start a guided session
    Start,
    /// Advance the session by elapsed seconds
    Tick {
        /// Seconds elapsed since the last tick
        secs: f64,
    },
    /// Abort the session without saving a record
    Stop,
    /// Return to the ready state
    Reset,
    /// Print current exercise state as JSON
    Status,
    /// Run a whole session in the foreground, one JSON event per line
    Run {
        /// Do not wait between ticks
        #[arg(long)]
        fast: bool,
    },
}

fn load_engine(db: &Database, config: ExerciseConfig) -> ExercisePhaseEngine {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(mut engine) = serde_json::from_str::<ExercisePhaseEngine>(&json) {
            // An idle engine follows the stored configuration.
            if engine.phase() == ExercisePhase::Ready && *engine.config() != config {
                engine.set_config(config);
            }
            return engine;
        }
    }
    ExercisePhaseEngine::new(config)
}

fn save_engine(db: &Database, engine: &ExercisePhaseEngine) -> CliResult {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

fn print_events_or_snapshot(engine: &ExercisePhaseEngine, events: &[Event]) -> CliResult {
    if events.is_empty() {
        print_json(&engine.snapshot())?;
    } else {
        print_json(events)?;
    }
    Ok(())
}

pub fn run(action: ExerciseAction) -> CliResult {
    let mut store = open_store()?;
    let db = Database::open()?;
    let mut engine = load_engine(&db, *store.config());

    match action {
        ExerciseAction::Start => {
            let events = engine.start();
            print_events_or_snapshot(&engine, &events)?;
        }
        ExerciseAction::Tick { secs } => {
            let mut events = engine.advance(secs);
            let added = store_finished(&mut store, &events);
            events.extend(added);
            print_events_or_snapshot(&engine, &events)?;
        }
        ExerciseAction::Stop => {
            let events: Vec<Event> = engine.stop().into_iter().collect();
            print_events_or_snapshot(&engine, &events)?;
        }
        ExerciseAction::Reset => {
            print_json(&engine.reset())?;
        }
        ExerciseAction::Status => {
            print_json(&engine.snapshot())?;
        }
        ExerciseAction::Run { fast } => {
            let mut session = ExercisePhaseEngine::new(*store.config());
            let started = session.start();
            if started.is_empty() {
                return Err("stored exercise config cannot start a session".into());
            }
            emit_lines(&started)?;
            let secs = TICK.as_secs_f64();
            while session.phase() != ExercisePhase::Completed {
                if !fast {
                    std::thread::sleep(TICK);
                }
                let events = session.advance(secs);
                if events.is_empty() {
                    continue;
                }
                emit_lines(&events)?;
                emit_lines(&store_finished(&mut store, &events))?;
            }
            debug!("foreground exercise finished");
        }
    }

    save_engine(&db, &engine)?;
    Ok(())
}

fn emit_lines(events: &[Event]) -> CliResult {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}
