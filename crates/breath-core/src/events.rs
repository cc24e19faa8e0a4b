use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{BreathRecord, BreathType};
use crate::task::DailyTask;
use crate::timer::ExercisePhase;

/// Feedback cue strength attached to phase boundaries and milestones.
///
/// The presentation layer maps these onto haptics or sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Light,
    Medium,
    Heavy,
    Success,
}

/// Every state change in the system produces an Event.
/// The presentation layer consumes them; the store consumes `SessionFinished`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ExerciseStarted {
        cycles: u32,
        total_secs: f64,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        from: ExercisePhase,
        to: ExercisePhase,
        cycle: u32,
        duration_secs: f64,
        cue: Cue,
        at: DateTime<Utc>,
    },
    /// Emitted when leaving `Rest`; `completed` counts finished cycles.
    CycleCompleted {
        completed: u32,
        cycles: u32,
        at: DateTime<Utc>,
    },
    /// Exactly one per completed session; aborted sessions never emit it.
    SessionFinished {
        record: BreathRecord,
        at: DateTime<Utc>,
    },
    ExerciseStopped {
        phase: ExercisePhase,
        cycle: u32,
        at: DateTime<Utc>,
    },
    ExerciseReset {
        at: DateTime<Utc>,
    },
    ExerciseSnapshot {
        phase: ExercisePhase,
        cycle: u32,
        cycles: u32,
        remaining_secs: f64,
        phase_total_secs: f64,
        progress: f64,
        session_progress: f64,
        at: DateTime<Utc>,
    },
    StopwatchStarted {
        kind: BreathType,
        cue: Cue,
        at: DateTime<Utc>,
    },
    StopwatchMilestone {
        kind: BreathType,
        elapsed_secs: f64,
        cue: Cue,
        at: DateTime<Utc>,
    },
    StopwatchStopped {
        record: BreathRecord,
        at: DateTime<Utc>,
    },
    /// A record was stored and optionally advanced a daily task.
    RecordAdded {
        record: BreathRecord,
        task: Option<DailyTask>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The finished record, if this event carries one for persistence.
    pub fn finished_record(&self) -> Option<&BreathRecord> {
        match self {
            Event::SessionFinished { record, .. } | Event::StopwatchStopped { record, .. } => {
                Some(record)
            }
            _ => None,
        }
    }
}
