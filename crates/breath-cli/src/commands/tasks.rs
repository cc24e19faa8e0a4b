use chrono::Local;
use serde_json::json;

use super::{open_store, print_json, CliResult};

pub fn run() -> CliResult {
    let store = open_store()?;
    let tasks: Vec<serde_json::Value> = store
        .tasks_for(Local::now().date_naive())
        .into_iter()
        .map(|task| {
            json!({
                "id": task.id,
                "title": task.title,
                "type": task.breath_type,
                "current": task.current,
                "target": task.target,
                "progress": task.progress(),
                "completed": task.is_completed(),
            })
        })
        .collect();
    print_json(&tasks)?;
    Ok(())
}
