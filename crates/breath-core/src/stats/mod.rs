//! Statistics over breath records.
//!
//! Everything here is a pure read-side computation: the same records always
//! give the same numbers, and an empty input gives zeros rather than errors.

mod history;

pub use history::{filter_by_type, group_by_day, group_by_day_in, DayGroup};

use serde::{Deserialize, Serialize};

use crate::record::{BreathRecord, BreathType};

/// Window of history shown on the stats screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// Same local calendar day.
    Today,
    /// Rolling seven days.
    Week,
    /// Rolling calendar month.
    Month,
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(Timeframe::Today),
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            other => Err(format!("unknown timeframe: {other}")),
        }
    }
}

/// Summary cards for a record subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_sessions: usize,
    /// Seconds
    pub total_duration: f64,
    /// Seconds, 0 when there are no sessions
    pub average_duration: f64,
    /// Longest hold in the subset, seconds
    pub best_hold: Option<f64>,
}

/// Per-type average row for the performance chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAverage {
    pub breath_type: BreathType,
    pub sessions: usize,
    pub average: f64,
}

/// Best record per type over some history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestScore {
    pub breath_type: BreathType,
    pub record: Option<BreathRecord>,
}

/// Aggregations over a borrowed record subset.
#[derive(Debug, Clone)]
pub struct StatsAggregator<'a> {
    records: Vec<&'a BreathRecord>,
}

impl<'a> StatsAggregator<'a> {
    pub fn new(records: impl IntoIterator<Item = &'a BreathRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    pub fn total_duration(&self) -> f64 {
        self.records.iter().map(|r| r.duration).sum()
    }

    /// Mean duration, 0 for an empty subset.
    pub fn average(&self) -> f64 {
        mean(self.records.iter().map(|r| r.duration))
    }

    /// Longest record of `breath_type`; the earliest stored wins ties.
    pub fn best(&self, breath_type: BreathType) -> Option<&'a BreathRecord> {
        self.records
            .iter()
            .copied()
            .filter(|r| r.breath_type == breath_type)
            .fold(None, |best: Option<&'a BreathRecord>, r| match best {
                Some(b) if b.duration >= r.duration => Some(b),
                _ => Some(r),
            })
    }

    /// Mean duration of `breath_type` records, 0 when there are none.
    pub fn average_for(&self, breath_type: BreathType) -> f64 {
        mean(
            self.records
                .iter()
                .filter(|r| r.breath_type == breath_type)
                .map(|r| r.duration),
        )
    }

    pub fn count_for(&self, breath_type: BreathType) -> usize {
        self.records
            .iter()
            .filter(|r| r.breath_type == breath_type)
            .count()
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            total_sessions: self.total_count(),
            total_duration: self.total_duration(),
            average_duration: self.average(),
            best_hold: self.best(BreathType::Hold).map(|r| r.duration),
        }
    }

    /// Chart rows for each type that has at least one record.
    pub fn chart(&self) -> Vec<TypeAverage> {
        BreathType::ALL
            .iter()
            .filter_map(|&breath_type| {
                let sessions = self.count_for(breath_type);
                (sessions > 0).then(|| TypeAverage {
                    breath_type,
                    sessions,
                    average: self.average_for(breath_type),
                })
            })
            .collect()
    }

    /// Best record for every type, present or not.
    pub fn best_scores(&self) -> Vec<BestScore> {
        BreathType::ALL
            .iter()
            .map(|&breath_type| BestScore {
                breath_type,
                record: self.best(breath_type).cloned(),
            })
            .collect()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
