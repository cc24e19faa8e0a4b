//! Breath session records and their derived score bands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of breathing activity a record was produced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreathType {
    Hold,
    Exhale,
    Exercise,
}

impl BreathType {
    pub const ALL: [BreathType; 3] = [BreathType::Hold, BreathType::Exhale, BreathType::Exercise];

    /// Localization key for the type's display name.
    pub fn display_key(self) -> &'static str {
        match self {
            BreathType::Hold => "breath_hold",
            BreathType::Exhale => "breath_exhale",
            BreathType::Exercise => "breath_exercise",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BreathType::Hold => "Hold",
            BreathType::Exhale => "Exhale",
            BreathType::Exercise => "Exercise",
        }
    }
}

impl std::fmt::Display for BreathType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BreathType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hold" => Ok(BreathType::Hold),
            "exhale" => Ok(BreathType::Exhale),
            "exercise" => Ok(BreathType::Exercise),
            other => Err(format!("unknown breath type: {other}")),
        }
    }
}

/// One completed breathing session.
///
/// Records are never mutated after creation; the store only prepends and
/// bulk-clears them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub breath_type: BreathType,
    /// Seconds, never negative.
    pub duration: f64,
}

impl BreathRecord {
    /// Create a record with a fresh id. Negative or NaN durations are stored as 0.
    pub fn new(breath_type: BreathType, duration: f64, date: DateTime<Utc>) -> Self {
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        Self {
            id: Uuid::new_v4(),
            date,
            breath_type,
            duration,
        }
    }

    /// Create a record dated now.
    pub fn now(breath_type: BreathType, duration: f64) -> Self {
        Self::new(breath_type, duration, Utc::now())
    }

    pub fn score_level(&self) -> ScoreLevel {
        ScoreLevel::for_duration(self.duration)
    }
}

/// Duration band used by history and result screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreLevel {
    Weak,
    Improving,
    Good,
    Swimmer,
    Excellent,
    Diver,
}

impl ScoreLevel {
    pub fn for_duration(duration: f64) -> Self {
        match duration {
            d if d < 10.0 => ScoreLevel::Weak,
            d if d < 20.0 => ScoreLevel::Improving,
            d if d < 30.0 => ScoreLevel::Good,
            d if d < 45.0 => ScoreLevel::Swimmer,
            d if d < 60.0 => ScoreLevel::Excellent,
            _ => ScoreLevel::Diver,
        }
    }

    /// Localization key for the band label.
    pub fn key(self) -> &'static str {
        match self {
            ScoreLevel::Weak => "score_weak",
            ScoreLevel::Improving => "score_improving",
            ScoreLevel::Good => "score_good",
            ScoreLevel::Swimmer => "score_swimmer",
            ScoreLevel::Excellent => "score_excellent",
            ScoreLevel::Diver => "score_diver",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            ScoreLevel::Weak => "😮‍💨",
            ScoreLevel::Improving => "💪",
            ScoreLevel::Good => "🔥",
            ScoreLevel::Swimmer => "🏊",
            ScoreLevel::Excellent => "⭐",
            ScoreLevel::Diver => "🤿",
        }
    }
}
