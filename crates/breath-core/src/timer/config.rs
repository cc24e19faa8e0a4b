use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Phase of a guided breathing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExercisePhase {
    Ready,
    Inhale,
    Hold,
    Exhale,
    Rest,
    Completed,
}

impl ExercisePhase {
    /// Phases that count down and accept ticks.
    pub fn is_running(self) -> bool {
        matches!(
            self,
            ExercisePhase::Inhale
                | ExercisePhase::Hold
                | ExercisePhase::Exhale
                | ExercisePhase::Rest
        )
    }

    /// Localization key for the phase prompt.
    pub fn display_key(self) -> &'static str {
        match self {
            ExercisePhase::Ready => "relax_get_ready",
            ExercisePhase::Inhale => "inhale",
            ExercisePhase::Hold => "hold",
            ExercisePhase::Exhale => "exhale",
            ExercisePhase::Rest => "rest",
            ExercisePhase::Completed => "great_job",
        }
    }
}

pub const HOLD_RANGE: (f64, f64) = (2.0, 30.0);
pub const EXHALE_RANGE: (f64, f64) = (2.0, 30.0);
pub const REST_RANGE: (f64, f64) = (1.0, 10.0);
pub const CYCLES_RANGE: (u32, u32) = (1, 20);

/// Timing parameters for a guided session. All durations in seconds.
///
/// The inhale phase reuses `hold_duration`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseConfig {
    #[serde(default = "default_hold_duration")]
    pub hold_duration: f64,
    #[serde(default = "default_exhale_duration")]
    pub exhale_duration: f64,
    #[serde(default = "default_rest_duration")]
    pub rest_duration: f64,
    #[serde(default = "default_cycles")]
    pub cycles: u32,
}

fn default_hold_duration() -> f64 {
    4.0
}
fn default_exhale_duration() -> f64 {
    6.0
}
fn default_rest_duration() -> f64 {
    2.0
}
fn default_cycles() -> u32 {
    5
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            hold_duration: default_hold_duration(),
            exhale_duration: default_exhale_duration(),
            rest_duration: default_rest_duration(),
            cycles: default_cycles(),
        }
    }
}

impl ExerciseConfig {
    pub fn new(hold_duration: f64, exhale_duration: f64, rest_duration: f64, cycles: u32) -> Self {
        Self {
            hold_duration,
            exhale_duration,
            rest_duration,
            cycles,
        }
    }

    /// Configured length of `phase`; zero for `Ready` and `Completed`.
    pub fn phase_duration(&self, phase: ExercisePhase) -> f64 {
        match phase {
            ExercisePhase::Inhale | ExercisePhase::Hold => self.hold_duration,
            ExercisePhase::Exhale => self.exhale_duration,
            ExercisePhase::Rest => self.rest_duration,
            ExercisePhase::Ready | ExercisePhase::Completed => 0.0,
        }
    }

    /// Inhale + hold + exhale + rest.
    pub fn cycle_duration(&self) -> f64 {
        2.0 * self.hold_duration + self.exhale_duration + self.rest_duration
    }

    pub fn total_duration(&self) -> f64 {
        self.cycles as f64 * self.cycle_duration()
    }

    /// Whole minutes and remaining whole seconds of the session, for previews.
    pub fn total_minutes_seconds(&self) -> (u64, u64) {
        let total = self.total_duration().max(0.0) as u64;
        (total / 60, total % 60)
    }

    /// Check every field against its allowed range.
    ///
    /// # Errors
    /// Returns the first field found outside its range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("hold_duration", self.hold_duration, HOLD_RANGE)?;
        check_range("exhale_duration", self.exhale_duration, EXHALE_RANGE)?;
        check_range("rest_duration", self.rest_duration, REST_RANGE)?;
        check_range(
            "cycles",
            self.cycles as f64,
            (CYCLES_RANGE.0 as f64, CYCLES_RANGE.1 as f64),
        )
    }

    /// Whether the engine can run on these values at all.
    pub fn is_positive(&self) -> bool {
        [self.hold_duration, self.exhale_duration, self.rest_duration]
            .iter()
            .all(|d| d.is_finite() && *d > 0.0)
            && self.cycles > 0
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
) -> Result<(), ValidationError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}
