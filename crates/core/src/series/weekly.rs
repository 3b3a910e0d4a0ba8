use crate::domain::record::{DailyRecord, WeeklySummary};
use crate::time::week::{build_week_ranges, locate, WeekRange};
use chrono::{NaiveDate, Weekday};

/// How a week's daily records collapse into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduce {
    /// Sum of the present values.
    Sum,
    /// Number of records carrying a present value.
    Count,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyOutcome<T> {
    pub summaries: Vec<T>,

    /// Dates of records that fell outside every range. Always empty when the
    /// ranges were built from the series' own extent.
    pub unmatched: Vec<NaiveDate>,
}

impl<T> WeeklyOutcome<T> {
    pub fn empty() -> Self {
        Self {
            summaries: Vec::new(),
            unmatched: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    sum: f64,
    count: usize,
    uncertain: bool,
    first: Option<NaiveDate>,
    last: Option<NaiveDate>,
}

impl Bucket {
    fn add(&mut self, r: &DailyRecord) {
        self.first = Some(self.first.map_or(r.date, |d| d.min(r.date)));
        self.last = Some(self.last.map_or(r.date, |d| d.max(r.date)));
        if let Some(v) = r.value {
            self.sum += v;
            self.count += 1;
        }
        self.uncertain |= r.is_aggregated;
    }

    fn reduce(&self, reduce: Reduce) -> f64 {
        match reduce {
            Reduce::Sum => self.sum,
            Reduce::Count => self.count as f64,
        }
    }
}

/// Buckets `daily` into `ranges` and reduces each bucket.
///
/// Ranges holding no record at either end are dropped. The first summary
/// starts at its first member day and the last one ends at its last member
/// day, so no week claims days outside the observed data. `first_from` moves
/// the first start earlier, never past a member day nor before the range.
pub fn weeklize(
    daily: &[DailyRecord],
    ranges: &[WeekRange],
    reduce: Reduce,
    first_from: Option<NaiveDate>,
) -> WeeklyOutcome<WeeklySummary> {
    let mut buckets = vec![Bucket::default(); ranges.len()];
    let mut unmatched = Vec::new();
    for r in daily {
        match locate(ranges, r.date) {
            Some(i) => buckets[i].add(r),
            None => unmatched.push(r.date),
        }
    }

    if let Some(date) = unmatched.first() {
        tracing::warn!(
            unmatched = unmatched.len(),
            first_unmatched = %date,
            "daily records outside every week range"
        );
    }

    let (Some(head), Some(tail)) = (
        buckets.iter().position(|b| b.first.is_some()),
        buckets.iter().rposition(|b| b.first.is_some()),
    ) else {
        return WeeklyOutcome {
            summaries: Vec::new(),
            unmatched,
        };
    };

    let summaries = ranges[head..=tail]
        .iter()
        .zip(&buckets[head..=tail])
        .enumerate()
        .map(|(i, (range, bucket))| {
            let mut from = range.from;
            let mut to = range.to;
            if let (0, Some(first)) = (i, bucket.first) {
                from = first_week_from(range, first, first_from);
            }
            if let (true, Some(last)) = (head + i == tail, bucket.last) {
                to = last;
            }
            WeeklySummary {
                from,
                to,
                value: bucket.reduce(reduce),
                uncertain: bucket.uncertain,
            }
        })
        .collect();

    WeeklyOutcome {
        summaries,
        unmatched,
    }
}

fn first_week_from(range: &WeekRange, first: NaiveDate, anchor: Option<NaiveDate>) -> NaiveDate {
    match anchor {
        Some(anchor) if anchor <= first => anchor.max(range.from),
        Some(anchor) => {
            tracing::warn!(%anchor, %first, "first-week anchor after the first day; ignored");
            first
        }
        None => first,
    }
}

/// [`weeklize`] over week ranges spanning the series itself (extended back to
/// `first_from` when that is earlier).
pub fn weeklize_series(
    daily: &[DailyRecord],
    week_start: Weekday,
    reduce: Reduce,
    first_from: Option<NaiveDate>,
) -> WeeklyOutcome<WeeklySummary> {
    let (Some(first), Some(last)) = (daily.first(), daily.last()) else {
        return WeeklyOutcome::empty();
    };

    let begin = first_from.map_or(first.date, |anchor| anchor.min(first.date));
    let ranges = build_week_ranges(begin, last.date, week_start);
    weeklize(daily, &ranges, reduce, first_from)
}
