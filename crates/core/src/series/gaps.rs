use crate::domain::record::{DailyRecord, DatedRecord};
use crate::error::malformed;
use chrono::NaiveDate;

/// Inserts a placeholder for every calendar day missing between adjacent
/// records, so consecutive dates differ by exactly one day.
///
/// The input must be ascending. Empty input yields empty output.
pub fn fill_gaps<T: DatedRecord>(series: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(series.len());
    let mut prev: Option<NaiveDate> = None;

    for record in series {
        let date = record.date();
        if let Some(prev) = prev {
            out.extend(
                prev.iter_days()
                    .skip(1)
                    .take_while(|d| *d < date)
                    .map(T::placeholder),
            );
        }
        out.push(record.clone());
        prev = Some(date);
    }

    out
}

/// Drops data-less records between the first and last observed day, so a
/// series which already went through [`fill_gaps`] is back to its input.
///
/// Leading and trailing records without data are kept: [`fill_gaps`] never
/// creates them, so they are days the source reported as absent. A series
/// without any observed day is returned unchanged.
pub fn strip_placeholders<T: DatedRecord>(series: &[T]) -> Vec<T> {
    let observed = |r: &T| !r.is_placeholder();
    let (Some(first), Some(last)) = (
        series.iter().position(observed),
        series.iter().rposition(observed),
    ) else {
        return series.to_vec();
    };

    series
        .iter()
        .enumerate()
        .filter(|(i, r)| *i < first || *i > last || !r.is_placeholder())
        .map(|(_, r)| r.clone())
        .collect()
}

/// Appends zero-valued records for each day after the series' last date up
/// to and including `through`. Never shortens a series.
pub fn extend_with_zeros(
    series_name: &'static str,
    series: &[DailyRecord],
    through: NaiveDate,
) -> anyhow::Result<Vec<DailyRecord>> {
    let last = series
        .last()
        .map(|r| r.date)
        .ok_or_else(|| malformed(series_name, "cannot extend an empty series"))?;

    let mut out = series.to_vec();
    out.extend(
        last.iter_days()
            .skip(1)
            .take_while(|d| *d <= through)
            .map(|d| DailyRecord::new(d, Some(0.0))),
    );

    Ok(out)
}
