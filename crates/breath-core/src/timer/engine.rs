//! Guided breathing phase engine.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads or read the wall clock - the caller is responsible for calling
//! `advance()` periodically with the elapsed seconds since the last call.
//!
//! ## State Transitions
//!
//! ```text
//! Ready -> Inhale -> Hold -> Exhale -> Rest -+-> Inhale (next cycle)
//!                                            +-> Completed (last cycle)
//! (running) --stop()--> Ready
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = ExercisePhaseEngine::new(config);
//! engine.start();
//! // In a loop:
//! for event in engine.advance(0.1) { /* render / persist */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{ExerciseConfig, ExercisePhase};
use crate::events::{Cue, Event};
use crate::record::{BreathRecord, BreathType};

/// Remaining time at or below this counts as elapsed. Absorbs float drift
/// from repeated fractional ticks.
const PHASE_EPSILON: f64 = 1e-9;

/// Core exercise engine.
///
/// Not re-entrant: at most one `advance` call may be in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExercisePhaseEngine {
    config: ExerciseConfig,
    phase: ExercisePhase,
    /// Zero-based; equals `config.cycles` once completed.
    current_cycle: u32,
    /// Seconds left in the current phase.
    phase_time_remaining: f64,
}

impl ExercisePhaseEngine {
    /// Create a new engine in the `Ready` state.
    pub fn new(config: ExerciseConfig) -> Self {
        Self {
            config,
            phase: ExercisePhase::Ready,
            current_cycle: 0,
            phase_time_remaining: 0.0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> ExercisePhase {
        self.phase
    }

    pub fn current_cycle(&self) -> u32 {
        self.current_cycle
    }

    pub fn phase_time_remaining(&self) -> f64 {
        self.phase_time_remaining
    }

    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    /// Configured length of the current phase.
    pub fn phase_total(&self) -> f64 {
        self.config.phase_duration(self.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.phase_total();
        if !self.phase.is_running() || total <= 0.0 {
            return 0.0;
        }
        (1.0 - self.phase_time_remaining / total).clamp(0.0, 1.0)
    }

    /// 0.0 .. 1.0 progress across the whole session.
    pub fn session_progress(&self) -> f64 {
        let total = self.config.total_duration();
        match self.phase {
            ExercisePhase::Completed => 1.0,
            ExercisePhase::Ready => 0.0,
            _ if total <= 0.0 => 0.0,
            phase => {
                let before_phase: f64 = PHASE_ORDER
                    .iter()
                    .take_while(|p| **p != phase)
                    .map(|p| self.config.phase_duration(*p))
                    .sum();
                let elapsed = self.current_cycle as f64 * self.config.cycle_duration()
                    + before_phase
                    + (self.phase_total() - self.phase_time_remaining).max(0.0);
                (elapsed / total).clamp(0.0, 1.0)
            }
        }
    }

    /// Circle scale hint: grows while inhaling, shrinks while exhaling.
    pub fn breathing_scale(&self) -> f64 {
        match self.phase {
            ExercisePhase::Inhale => 1.0 + 0.5 * self.progress(),
            ExercisePhase::Hold => 1.5,
            ExercisePhase::Exhale => 1.5 - 0.5 * self.progress(),
            _ => 1.0,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::ExerciseSnapshot {
            phase: self.phase,
            cycle: self.current_cycle,
            cycles: self.config.cycles,
            remaining_secs: self.phase_time_remaining,
            phase_total_secs: self.phase_total(),
            progress: self.progress(),
            session_progress: self.session_progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session. Rejected (empty result) unless the engine is `Ready`.
    pub fn start(&mut self) -> Vec<Event> {
        if self.phase != ExercisePhase::Ready {
            debug!(phase = ?self.phase, "start ignored, exercise already underway");
            return Vec::new();
        }
        if !self.config.is_positive() {
            debug!(config = ?self.config, "start ignored, non-positive exercise config");
            return Vec::new();
        }
        self.current_cycle = 0;
        let mut events = vec![Event::ExerciseStarted {
            cycles: self.config.cycles,
            total_secs: self.config.total_duration(),
            at: Utc::now(),
        }];
        events.push(self.enter(ExercisePhase::Inhale));
        events
    }

    /// Consume `delta_secs` of elapsed time.
    ///
    /// Performs at most one phase transition per call; overshoot is dropped
    /// and the next phase starts with its full duration.
    pub fn advance(&mut self, delta_secs: f64) -> Vec<Event> {
        if !self.phase.is_running() {
            return Vec::new();
        }
        if delta_secs.is_finite() && delta_secs > 0.0 {
            self.phase_time_remaining -= delta_secs;
        }
        if self.phase_time_remaining > PHASE_EPSILON {
            return Vec::new();
        }
        self.transition()
    }

    /// Abort a running session. No record is produced.
    pub fn stop(&mut self) -> Option<Event> {
        if !self.phase.is_running() {
            return None;
        }
        let event = Event::ExerciseStopped {
            phase: self.phase,
            cycle: self.current_cycle,
            at: Utc::now(),
        };
        debug!(phase = ?self.phase, cycle = self.current_cycle, "exercise stopped");
        self.clear();
        Some(event)
    }

    /// Return to `Ready` from any state.
    pub fn reset(&mut self) -> Event {
        self.clear();
        Event::ExerciseReset { at: Utc::now() }
    }

    pub fn set_config(&mut self, config: ExerciseConfig) {
        self.config = config;
        self.clear();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn transition(&mut self) -> Vec<Event> {
        match self.phase {
            ExercisePhase::Inhale => vec![self.enter(ExercisePhase::Hold)],
            ExercisePhase::Hold => vec![self.enter(ExercisePhase::Exhale)],
            ExercisePhase::Exhale => vec![self.enter(ExercisePhase::Rest)],
            ExercisePhase::Rest => {
                self.current_cycle += 1;
                let mut events = vec![Event::CycleCompleted {
                    completed: self.current_cycle,
                    cycles: self.config.cycles,
                    at: Utc::now(),
                }];
                if self.current_cycle < self.config.cycles {
                    events.push(self.enter(ExercisePhase::Inhale));
                } else {
                    events.extend(self.complete());
                }
                events
            }
            ExercisePhase::Ready | ExercisePhase::Completed => Vec::new(),
        }
    }

    fn enter(&mut self, to: ExercisePhase) -> Event {
        let from = self.phase;
        self.phase = to;
        self.phase_time_remaining = self.config.phase_duration(to);
        debug!(?from, ?to, cycle = self.current_cycle, "phase changed");
        Event::PhaseChanged {
            from,
            to,
            cycle: self.current_cycle,
            duration_secs: self.phase_time_remaining,
            cue: cue_for(to),
            at: Utc::now(),
        }
    }

    fn complete(&mut self) -> [Event; 2] {
        let changed = self.enter(ExercisePhase::Completed);
        let now = Utc::now();
        let record = BreathRecord::new(BreathType::Exercise, self.config.total_duration(), now);
        debug!(duration = record.duration, "exercise completed");
        [changed, Event::SessionFinished { record, at: now }]
    }

    fn clear(&mut self) {
        self.phase = ExercisePhase::Ready;
        self.current_cycle = 0;
        self.phase_time_remaining = 0.0;
    }
}

const PHASE_ORDER: [ExercisePhase; 4] = [
    ExercisePhase::Inhale,
    ExercisePhase::Hold,
    ExercisePhase::Exhale,
    ExercisePhase::Rest,
];

fn cue_for(phase: ExercisePhase) -> Cue {
    match phase {
        ExercisePhase::Hold => Cue::Heavy,
        ExercisePhase::Rest => Cue::Light,
        ExercisePhase::Completed => Cue::Success,
        _ => Cue::Medium,
    }
}
