use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use breath_core::{BreathRecord, BreathStopwatch, Event, StopwatchKind};
use chrono::Utc;
use clap::Subcommand;

use super::{open_store, print_json, store_finished, CliResult};

const TICK: Duration = Duration::from_millis(100);

#[derive(Subcommand)]
pub enum StopwatchAction {
    /// Add a session measured elsewhere
    Record {
        /// Duration in seconds
        secs: f64,
    },
    /// Time a session now; press Enter to stop
    Time,
}

pub fn run(kind: StopwatchKind, action: StopwatchAction) -> CliResult {
    let mut store = open_store()?;

    match action {
        StopwatchAction::Record { secs } => {
            if !secs.is_finite() || secs < 0.0 {
                return Err(format!("duration must be a non-negative number, got {secs}").into());
            }
            let finished = [Event::StopwatchStopped {
                record: BreathRecord::now(kind.into(), secs),
                at: Utc::now(),
            }];
            print_json(&store_finished(&mut store, &finished))?;
        }
        StopwatchAction::Time => {
            let record = time_interactively(kind)?;
            let mut events = vec![Event::StopwatchStopped {
                record,
                at: Utc::now(),
            }];
            let added = store_finished(&mut store, &events);
            events.extend(added);
            for event in &events {
                println!("{}", serde_json::to_string(event)?);
            }
        }
    }
    Ok(())
}

/// Tick a stopwatch in real time until a line arrives on stdin.
fn time_interactively(kind: StopwatchKind) -> Result<BreathRecord, Box<dyn std::error::Error>> {
    let mut watch = BreathStopwatch::new(kind);
    if let Some(event) = watch.start() {
        println!("{}", serde_json::to_string(&event)?);
    }
    eprintln!("timing {}, press Enter to stop", breath_core::BreathType::from(kind));

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
        let _ = tx.send(());
    });

    let mut last = Instant::now();
    loop {
        let stop = match rx.recv_timeout(TICK) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
        };
        let now = Instant::now();
        if let Some(event) = watch.advance((now - last).as_secs_f64()) {
            println!("{}", serde_json::to_string(&event)?);
        }
        last = now;
        if stop {
            break;
        }
    }

    watch.stop().ok_or_else(|| "stopwatch was not running".into())
}
