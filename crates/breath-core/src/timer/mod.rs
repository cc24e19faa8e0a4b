mod config;
mod engine;
mod stopwatch;

pub use config::{
    ExerciseConfig, ExercisePhase, CYCLES_RANGE, EXHALE_RANGE, HOLD_RANGE, REST_RANGE,
};
pub use engine::ExercisePhaseEngine;
pub use stopwatch::{BreathStopwatch, StopwatchKind};
