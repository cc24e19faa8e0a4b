use breath_core::storage::Database;
use serde_json::json;

use super::exercise::ENGINE_KEY;
use super::{open_store, print_json, CliResult};

pub fn run(yes: bool) -> CliResult {
    if !yes {
        return Err("refusing to delete all records and tasks without --yes".into());
    }

    let mut store = open_store()?;
    let records = store.records().len();
    let tasks = store.tasks().len();
    store.reset_all();
    Database::open()?.kv_delete(ENGINE_KEY)?;

    print_json(&json!({ "deleted": { "records": records, "tasks": tasks } }))?;
    Ok(())
}
