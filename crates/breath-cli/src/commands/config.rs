use breath_core::{Config, ConfigError, ExerciseConfig};
use clap::Subcommand;
use serde_json::json;

use super::{open_store, print_json, CliResult};

/// Keys under this prefix address the stored exercise parameters.
const EXERCISE_PREFIX: &str = "exercise.";

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "exercise.cycles", "logging.level")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

fn exercise_field(config: &ExerciseConfig, field: &str) -> Option<String> {
    match field {
        "hold_duration" => Some(config.hold_duration.to_string()),
        "exhale_duration" => Some(config.exhale_duration.to_string()),
        "rest_duration" => Some(config.rest_duration.to_string()),
        "cycles" => Some(config.cycles.to_string()),
        _ => None,
    }
}

fn set_exercise_field(
    config: &mut ExerciseConfig,
    key: &str,
    field: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    let seconds = || value.parse::<f64>().map_err(|e| invalid(e.to_string()));
    match field {
        "hold_duration" => config.hold_duration = seconds()?,
        "exhale_duration" => config.exhale_duration = seconds()?,
        "rest_duration" => config.rest_duration = seconds()?,
        "cycles" => config.cycles = value.parse::<u32>().map_err(|e| invalid(e.to_string()))?,
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    }
    Ok(())
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let value = match key.strip_prefix(EXERCISE_PREFIX) {
                Some(field) => exercise_field(open_store()?.config(), field),
                None => Config::load()?.get(&key),
            };
            match value {
                Some(value) => println!("{value}"),
                None => return Err(ConfigError::UnknownKey(key).into()),
            }
        }
        ConfigAction::Set { key, value } => {
            match key.strip_prefix(EXERCISE_PREFIX) {
                Some(field) => {
                    let mut store = open_store()?;
                    let mut exercise = *store.config();
                    set_exercise_field(&mut exercise, &key, field, &value)?;
                    store.save_config(exercise)?;
                }
                None => {
                    let mut config = Config::load()?;
                    config.set(&key, &value)?;
                }
            }
            print_json(&json!({ "key": key, "value": value }))?;
        }
        ConfigAction::List => {
            let store = open_store()?;
            let mut listing = serde_json::to_value(Config::load()?)?;
            if let Some(obj) = listing.as_object_mut() {
                obj.insert("exercise".into(), serde_json::to_value(store.config())?);
            }
            print_json(&listing)?;
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            open_store()?.save_config(ExerciseConfig::default())?;
            print_json(&json!({ "reset": true }))?;
        }
    }
    Ok(())
}
