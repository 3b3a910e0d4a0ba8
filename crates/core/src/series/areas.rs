use crate::domain::record::{AreaWeeklyCount, CaseRecord};
use crate::series::weekly::WeeklyOutcome;
use crate::time::week::{build_week_ranges, locate};
use chrono::Weekday;
use std::collections::BTreeMap;

pub const UNKNOWN_AREA: &str = "不明";

/// Weekly case counts per residence area from the line-list.
///
/// Every week between the first and last announcement appears, empty weeks
/// with an empty map. Edges are clamped to the announcement extent.
pub fn weekly_area_counts(
    cases: &[CaseRecord],
    week_start: Weekday,
) -> WeeklyOutcome<AreaWeeklyCount> {
    let (Some(begin), Some(end)) = (
        cases.iter().map(|c| c.announced).min(),
        cases.iter().map(|c| c.announced).max(),
    ) else {
        return WeeklyOutcome::empty();
    };

    let ranges = build_week_ranges(begin, end, week_start);
    let mut counts: Vec<BTreeMap<String, u32>> = vec![BTreeMap::new(); ranges.len()];
    let mut unmatched = Vec::new();

    for case in cases {
        let Some(i) = locate(&ranges, case.announced) else {
            unmatched.push(case.announced);
            continue;
        };
        let area = case.area.as_deref().unwrap_or(UNKNOWN_AREA);
        *counts[i].entry(area.to_string()).or_insert(0) += 1;
    }

    let mut summaries: Vec<AreaWeeklyCount> = ranges
        .iter()
        .zip(counts)
        .map(|(range, counts)| AreaWeeklyCount {
            from: range.from,
            to: range.to,
            counts,
        })
        .collect();

    if let Some(head) = summaries.first_mut() {
        head.from = begin;
    }
    if let Some(tail) = summaries.last_mut() {
        tail.to = end;
    }

    WeeklyOutcome {
        summaries,
        unmatched,
    }
}
