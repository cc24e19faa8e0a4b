use breath_core::{StatsAggregator, Timeframe};
use chrono::Local;
use clap::Subcommand;
use serde_json::json;

use super::{open_store, print_json, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// Last seven days
    Week,
    /// Last month
    Month,
    /// Best record of each type, all time
    Best,
}

pub fn run(action: StatsAction) -> CliResult {
    let store = open_store()?;

    let timeframe = match action {
        StatsAction::Today => Timeframe::Today,
        StatsAction::Week => Timeframe::Week,
        StatsAction::Month => Timeframe::Month,
        StatsAction::Best => {
            let scores = StatsAggregator::new(store.records()).best_scores();
            print_json(&scores)?;
            return Ok(());
        }
    };

    let stats = StatsAggregator::new(store.records_in(timeframe, Local::now()));
    print_json(&json!({
        "timeframe": timeframe,
        "summary": stats.summary(),
        "chart": stats.chart(),
    }))?;
    Ok(())
}
