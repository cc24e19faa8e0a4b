//! Hold / exhale stopwatch.
//!
//! Counts up while running and produces a record on `stop()`. Like the
//! exercise engine it is tick-driven: the caller supplies elapsed seconds.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::{Cue, Event};
use crate::record::{BreathRecord, BreathType};

const MILESTONE_SECS: f64 = 10.0;
/// Slack for float drift when many small ticks sum to a milestone.
const MILESTONE_EPSILON: f64 = 1e-6;
/// Elapsed time at which the visual scale stops changing.
const SCALE_CEILING_SECS: f64 = 120.0;

/// Which free-timed activity the stopwatch measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopwatchKind {
    Hold,
    Exhale,
}

impl From<StopwatchKind> for BreathType {
    fn from(kind: StopwatchKind) -> Self {
        match kind {
            StopwatchKind::Hold => BreathType::Hold,
            StopwatchKind::Exhale => BreathType::Exhale,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathStopwatch {
    kind: StopwatchKind,
    running: bool,
    elapsed: f64,
}

impl BreathStopwatch {
    pub fn new(kind: StopwatchKind) -> Self {
        Self {
            kind,
            running: false,
            elapsed: 0.0,
        }
    }

    pub fn kind(&self) -> StopwatchKind {
        self.kind
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        self.elapsed = 0.0;
        Some(Event::StopwatchStarted {
            kind: self.kind.into(),
            cue: Cue::Light,
            at: Utc::now(),
        })
    }

    /// Accumulate `delta_secs`. Returns a milestone event when a 10 s mark
    /// is crossed.
    pub fn advance(&mut self, delta_secs: f64) -> Option<Event> {
        if !self.running || !delta_secs.is_finite() || delta_secs <= 0.0 {
            return None;
        }
        let before = self.milestone_index();
        self.elapsed += delta_secs;
        let after = self.milestone_index();
        if after <= before {
            return None;
        }
        let mark = after * MILESTONE_SECS;
        Some(Event::StopwatchMilestone {
            kind: self.kind.into(),
            elapsed_secs: mark,
            cue: self.milestone_cue(mark),
            at: Utc::now(),
        })
    }

    /// Finish timing and produce the session record.
    pub fn stop(&mut self) -> Option<BreathRecord> {
        if !self.running {
            return None;
        }
        self.running = false;
        let record = BreathRecord::now(self.kind.into(), self.elapsed);
        self.elapsed = 0.0;
        Some(record)
    }

    /// Circle scale hint: holds grow 1.0 -> 2.5, exhales shrink 1.0 -> 0.3.
    pub fn visual_scale(&self) -> f64 {
        let progress = (self.elapsed / SCALE_CEILING_SECS).min(1.0);
        match self.kind {
            StopwatchKind::Hold => 1.0 + progress * 1.5,
            StopwatchKind::Exhale => 1.0 - progress * 0.7,
        }
    }

    fn milestone_index(&self) -> f64 {
        ((self.elapsed + MILESTONE_EPSILON) / MILESTONE_SECS).floor()
    }

    fn milestone_cue(&self, mark: f64) -> Cue {
        match self.kind {
            StopwatchKind::Hold if mark < 20.0 => Cue::Medium,
            StopwatchKind::Hold if mark < 30.0 => Cue::Heavy,
            StopwatchKind::Exhale if mark < 20.0 => Cue::Light,
            StopwatchKind::Exhale if mark < 30.0 => Cue::Medium,
            _ => Cue::Success,
        }
    }
}
