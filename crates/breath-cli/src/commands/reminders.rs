use breath_core::{Config, ReminderFrequency, ReminderTime};
use clap::Subcommand;
use serde_json::json;
use tracing::info;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum ReminderAction {
    /// List reminder settings
    List,
    /// Add a reminder time
    Add {
        /// Time of day as HH:MM
        time: String,
    },
    /// Remove the reminder time at an index
    Remove { index: usize },
    /// Turn one reminder time on or off
    Toggle { index: usize },
    /// Set how often reminders repeat (daily, weekdays)
    Frequency { frequency: ReminderFrequency },
    /// Turn reminders on
    Enable,
    /// Turn reminders off
    Disable,
    /// Print the notification triggers to register
    Plan {
        /// Plan as if notification permission were denied
        #[arg(long)]
        denied: bool,
    },
}

pub fn run(action: ReminderAction) -> CliResult {
    let mut config = Config::load()?;

    match action {
        ReminderAction::List => {
            print_json(&listing(&config))?;
            return Ok(());
        }
        ReminderAction::Plan { denied } => {
            print_json(&config.reminders.plan_if_permitted(!denied))?;
            return Ok(());
        }
        ReminderAction::Add { time } => config.reminders.add_time(ReminderTime::parse(&time)?),
        ReminderAction::Remove { index } => {
            let removed = config.reminders.remove_time(index)?;
            info!(time = %removed.label(), "reminder removed");
        }
        ReminderAction::Toggle { index } => {
            config.reminders.toggle_time(index)?;
        }
        ReminderAction::Frequency { frequency } => config.reminders.frequency = frequency,
        ReminderAction::Enable => config.reminders.enabled = true,
        ReminderAction::Disable => config.reminders.enabled = false,
    }

    config.save()?;
    print_json(&listing(&config))?;
    Ok(())
}

fn listing(config: &Config) -> serde_json::Value {
    let reminders = &config.reminders;
    let times: Vec<serde_json::Value> = reminders
        .times
        .iter()
        .enumerate()
        .map(|(index, time)| {
            json!({
                "index": index,
                "time": time.label(),
                "enabled": time.enabled,
                "id": time.id,
            })
        })
        .collect();
    json!({
        "enabled": reminders.enabled,
        "frequency": reminders.frequency,
        "times": times,
    })
}
