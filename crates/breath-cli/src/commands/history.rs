use breath_core::stats::{filter_by_type, group_by_day};
use breath_core::BreathType;
use serde_json::json;

use super::{open_store, print_json, CliResult};

pub fn run(breath_type: Option<BreathType>) -> CliResult {
    let store = open_store()?;
    let records = filter_by_type(store.records(), breath_type);

    let days: Vec<serde_json::Value> = group_by_day(records)
        .into_iter()
        .map(|group| {
            let entries: Vec<serde_json::Value> = group
                .records
                .iter()
                .map(|record| {
                    let score = record.score_level();
                    json!({
                        "id": record.id,
                        "date": record.date,
                        "type": record.breath_type,
                        "duration": record.duration,
                        "score": score.key(),
                        "emoji": score.emoji(),
                    })
                })
                .collect();
            json!({ "day": group.day, "records": entries })
        })
        .collect();

    print_json(&days)?;
    Ok(())
}
