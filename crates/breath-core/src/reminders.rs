//! Local reminder schedule.
//!
//! This module only plans triggers; registering them with the platform's
//! notification center is the caller's job. Message bodies are lookup keys.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

const MESSAGE_COUNT: usize = 8;
/// ISO weekday numbers for Monday through Friday.
const WEEKDAYS: [u8; 5] = [1, 2, 3, 4, 5];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    #[default]
    Daily,
    Weekdays,
}

impl std::str::FromStr for ReminderFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(ReminderFrequency::Daily),
            "weekdays" => Ok(ReminderFrequency::Weekdays),
            other => Err(format!("unknown reminder frequency: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTime {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub hour: u8,
    pub minute: u8,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ReminderTime {
    /// # Errors
    /// Returns an error unless `hour < 24` and `minute < 60`.
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        if hour >= 24 || minute >= 60 {
            return Err(ValidationError::InvalidTime(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            hour,
            minute,
            enabled: true,
        })
    }

    /// Parse `HH:MM`.
    ///
    /// # Errors
    /// Returns an error for malformed or out-of-range input.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = h.parse::<u8>().map_err(|_| invalid())?;
        let minute = m.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }

    pub fn minutes_of_day(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }

    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

/// One repeating notification the platform should register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTrigger {
    pub identifier: String,
    pub hour: u8,
    pub minute: u8,
    /// ISO weekday (1 = Monday); `None` repeats every day.
    pub weekday: Option<u8>,
    pub title_key: String,
    pub body_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub frequency: ReminderFrequency,
    #[serde(default = "default_times")]
    pub times: Vec<ReminderTime>,
}

fn default_true() -> bool {
    true
}

fn default_times() -> Vec<ReminderTime> {
    [9, 12, 15, 18, 21]
        .into_iter()
        .map(|hour| ReminderTime {
            id: Uuid::new_v4(),
            hour,
            minute: 0,
            enabled: true,
        })
        .collect()
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency: ReminderFrequency::Daily,
            times: default_times(),
        }
    }
}

impl ReminderSettings {
    /// Add a time, keeping the list sorted by time of day.
    pub fn add_time(&mut self, time: ReminderTime) {
        self.times.push(time);
        self.times.sort_by_key(ReminderTime::minutes_of_day);
    }

    /// Reject impossible times and restore time-of-day order. Used after
    /// the list was edited as raw data rather than through `add_time`.
    ///
    /// # Errors
    /// Returns an error naming the first time outside `00:00..=23:59`.
    pub fn normalize(&mut self) -> Result<(), ValidationError> {
        if let Some(bad) = self.times.iter().find(|t| t.hour >= 24 || t.minute >= 60) {
            return Err(ValidationError::InvalidTime(bad.label()));
        }
        self.times.sort_by_key(ReminderTime::minutes_of_day);
        Ok(())
    }

    /// # Errors
    /// Returns an error if `index` is out of bounds.
    pub fn remove_time(&mut self, index: usize) -> Result<ReminderTime, ValidationError> {
        self.check_index(index)?;
        Ok(self.times.remove(index))
    }

    /// Flip a time on or off; returns the new state.
    ///
    /// # Errors
    /// Returns an error if `index` is out of bounds.
    pub fn toggle_time(&mut self, index: usize) -> Result<bool, ValidationError> {
        self.check_index(index)?;
        let time = &mut self.times[index];
        time.enabled = !time.enabled;
        Ok(time.enabled)
    }

    /// Triggers to register; empty when reminders are disabled.
    pub fn plan(&self) -> Vec<ReminderTrigger> {
        if !self.enabled {
            return Vec::new();
        }
        let mut triggers = Vec::new();
        for (index, time) in self.times.iter().filter(|t| t.enabled).enumerate() {
            let body_key = format!("notif_msg_{}", index % MESSAGE_COUNT + 1);
            let base = format!("reminder-{}-{}", time.hour, time.minute);
            let trigger = |identifier: String, weekday: Option<u8>| ReminderTrigger {
                identifier,
                hour: time.hour,
                minute: time.minute,
                weekday,
                title_key: "notif_title".to_string(),
                body_key: body_key.clone(),
            };
            match self.frequency {
                ReminderFrequency::Daily => triggers.push(trigger(base, None)),
                ReminderFrequency::Weekdays => triggers.extend(
                    WEEKDAYS
                        .iter()
                        .map(|&day| trigger(format!("{base}-{day}"), Some(day))),
                ),
            }
        }
        triggers
    }

    /// Plan only when the platform has granted notification permission.
    pub fn plan_if_permitted(&self, authorized: bool) -> Vec<ReminderTrigger> {
        if authorized {
            self.plan()
        } else {
            Vec::new()
        }
    }

    fn check_index(&self, index: usize) -> Result<(), ValidationError> {
        if index < self.times.len() {
            Ok(())
        } else {
            Err(ValidationError::OutOfBounds {
                collection: "reminder times".to_string(),
                index,
                len: self.times.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_plan_five_daily_triggers() {
        let plan = ReminderSettings::default().plan();
        assert_eq!(plan.len(), 5);
        assert_eq!(plan[0].identifier, "reminder-9-0");
        assert_eq!(plan[0].body_key, "notif_msg_1");
        assert_eq!(plan[4].identifier, "reminder-21-0");
        assert!(plan.iter().all(|t| t.weekday.is_none()));
    }

    #[test]
    fn weekdays_expand_to_monday_through_friday() {
        let settings = ReminderSettings {
            frequency: ReminderFrequency::Weekdays,
            times: vec![ReminderTime::new(7, 30).unwrap()],
            ..ReminderSettings::default()
        };
        let plan = settings.plan();
        let ids: Vec<&str> = plan.iter().map(|t| t.identifier.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "reminder-7-30-1",
                "reminder-7-30-2",
                "reminder-7-30-3",
                "reminder-7-30-4",
                "reminder-7-30-5"
            ]
        );
    }

    #[test]
    fn disabled_times_and_settings_are_skipped() {
        let mut settings = ReminderSettings::default();
        assert!(!settings.toggle_time(0).unwrap());
        let plan = settings.plan();
        assert_eq!(plan.len(), 4);
        assert_eq!(plan[0].identifier, "reminder-12-0");
        assert_eq!(plan[0].body_key, "notif_msg_1");

        settings.enabled = false;
        assert!(settings.plan().is_empty());
    }

    #[test]
    fn message_keys_rotate_through_eight() {
        let mut settings = ReminderSettings {
            times: Vec::new(),
            ..ReminderSettings::default()
        };
        for hour in 8..18 {
            settings.add_time(ReminderTime::new(hour, 0).unwrap());
        }
        let plan = settings.plan();
        assert_eq!(plan[7].body_key, "notif_msg_8");
        assert_eq!(plan[8].body_key, "notif_msg_1");
    }

    #[test]
    fn add_keeps_times_sorted() {
        let mut settings = ReminderSettings::default();
        settings.add_time(ReminderTime::parse("10:45").unwrap());
        let labels: Vec<String> = settings.times.iter().map(ReminderTime::label).collect();
        assert_eq!(labels, vec!["09:00", "10:45", "12:00", "15:00", "18:00", "21:00"]);
    }

    #[test]
    fn invalid_times_and_indexes_are_rejected() {
        assert!(ReminderTime::parse("24:00").is_err());
        assert!(ReminderTime::parse("12:60").is_err());
        assert!(ReminderTime::parse("noon").is_err());
        let mut settings = ReminderSettings::default();
        assert!(matches!(
            settings.remove_time(9),
            Err(ValidationError::OutOfBounds { index: 9, len: 5, .. })
        ));
    }

    #[test]
    fn permission_gates_planning() {
        let settings = ReminderSettings::default();
        assert!(settings.plan_if_permitted(false).is_empty());
        assert_eq!(settings.plan_if_permitted(true).len(), 5);
    }
}
