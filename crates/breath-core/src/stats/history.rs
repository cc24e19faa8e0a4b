//! History list helpers: type filter and per-day grouping.

use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;

use crate::record::{BreathRecord, BreathType};

/// Records that fall on one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DayGroup<'a> {
    pub day: NaiveDate,
    pub records: Vec<&'a BreathRecord>,
}

/// Keep records of `breath_type`, or all records when `None`.
pub fn filter_by_type(
    records: &[BreathRecord],
    breath_type: Option<BreathType>,
) -> Vec<&BreathRecord> {
    records
        .iter()
        .filter(|r| breath_type.map_or(true, |t| r.breath_type == t))
        .collect()
}

/// Group by local calendar day.
pub fn group_by_day<'a>(records: impl IntoIterator<Item = &'a BreathRecord>) -> Vec<DayGroup<'a>> {
    group_by_day_in(records, &Local)
}

/// Group by calendar day in `tz`; days newest first, records keep their
/// stored order within a day.
pub fn group_by_day_in<'a, Tz: TimeZone>(
    records: impl IntoIterator<Item = &'a BreathRecord>,
    tz: &Tz,
) -> Vec<DayGroup<'a>> {
    let mut groups: Vec<DayGroup<'a>> = Vec::new();
    for record in records {
        let day = record.date.with_timezone(tz).date_naive();
        match groups.iter_mut().find(|g| g.day == day) {
            Some(group) => group.records.push(record),
            None => groups.push(DayGroup {
                day,
                records: vec![record],
            }),
        }
    }
    groups.sort_by(|a, b| b.day.cmp(&a.day));
    groups
}
