//! Gamified daily tasks.
//!
//! A fixed template of three tasks is generated once per calendar day.
//! Each new record of a matching type advances the first incomplete task:
//!
//! ```text
//! task_hold_3      Hold      0 -> 3
//! task_exhale_5    Exhale    0 -> 5
//! task_exercise_2  Exercise  0 -> 2
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::BreathType;

/// One daily goal. `title` is a localization key, never display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTask {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub target: u32,
    #[serde(default)]
    pub current: u32,
    /// `None` never matches a record.
    #[serde(rename = "type", default)]
    pub breath_type: Option<BreathType>,
    pub date: NaiveDate,
}

impl DailyTask {
    pub fn new(
        title: impl Into<String>,
        target: u32,
        breath_type: Option<BreathType>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            target: target.max(1),
            current: 0,
            breath_type,
            date,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.current >= self.target
    }

    /// 0.0 .. 1.0 completion.
    pub fn progress(&self) -> f64 {
        if self.target == 0 {
            return 1.0;
        }
        (self.current as f64 / self.target as f64).min(1.0)
    }

    /// Whether a record of `breath_type` on `day` can advance this task.
    pub fn accepts(&self, breath_type: BreathType, day: NaiveDate) -> bool {
        self.date == day && self.breath_type == Some(breath_type) && !self.is_completed()
    }

    /// Advance by one, saturating at `target`. Returns whether anything changed.
    pub fn increment(&mut self) -> bool {
        if self.is_completed() {
            return false;
        }
        self.current += 1;
        true
    }
}

/// The three-task template for `day`.
pub fn daily_template(day: NaiveDate) -> Vec<DailyTask> {
    vec![
        DailyTask::new("task_hold_3", 3, Some(BreathType::Hold), day),
        DailyTask::new("task_exhale_5", 5, Some(BreathType::Exhale), day),
        DailyTask::new("task_exercise_2", 2, Some(BreathType::Exercise), day),
    ]
}

/// Advance the first task in `tasks` that accepts the record.
///
/// Returns the index of the task that changed, if any.
pub fn apply_record(
    tasks: &mut [DailyTask],
    breath_type: BreathType,
    day: NaiveDate,
) -> Option<usize> {
    let index = tasks.iter().position(|t| t.accepts(breath_type, day))?;
    tasks[index].increment();
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn template_has_three_typed_tasks() {
        let tasks = daily_template(day());
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].title, "task_hold_3");
        assert_eq!(tasks[0].target, 3);
        assert_eq!(tasks[1].breath_type, Some(BreathType::Exhale));
        assert_eq!(tasks[2].target, 2);
        assert!(tasks.iter().all(|t| t.current == 0 && t.date == day()));
    }

    #[test]
    fn progress_is_clamped() {
        let mut task = DailyTask::new("task_hold_3", 3, Some(BreathType::Hold), day());
        assert_eq!(task.progress(), 0.0);
        task.current = 5;
        assert_eq!(task.progress(), 1.0);
        assert!(task.is_completed());
    }

    #[test]
    fn increment_never_passes_target() {
        let mut task = DailyTask::new("task_exercise_2", 2, Some(BreathType::Exercise), day());
        assert!(task.increment());
        assert!(task.increment());
        assert!(!task.increment());
        assert_eq!(task.current, 2);
    }

    #[test]
    fn apply_record_uses_first_match() {
        let mut tasks = vec![
            DailyTask::new("a", 1, Some(BreathType::Hold), day()),
            DailyTask::new("b", 1, Some(BreathType::Hold), day()),
        ];
        assert_eq!(apply_record(&mut tasks, BreathType::Hold, day()), Some(0));
        assert_eq!(apply_record(&mut tasks, BreathType::Hold, day()), Some(1));
        assert_eq!(apply_record(&mut tasks, BreathType::Hold, day()), None);
    }

    #[test]
    fn untyped_and_other_day_tasks_never_match() {
        let yesterday = day().pred_opt().unwrap();
        let mut tasks = vec![
            DailyTask::new("untyped", 3, None, day()),
            DailyTask::new("old", 3, Some(BreathType::Hold), yesterday),
        ];
        assert_eq!(apply_record(&mut tasks, BreathType::Hold, day()), None);
        assert!(tasks.iter().all(|t| t.current == 0));
    }
}
