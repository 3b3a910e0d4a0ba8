use crate::domain::record::DatedRecord;
use chrono::NaiveDate;

/// Day-over-day increments of a cumulative counter.
///
/// The result is one shorter than the input. An increment is kept only when
/// both neighbours are present and it is a finite, strictly positive number;
/// a drop means the source was corrected and is not reliable data.
pub fn deltas(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values
        .windows(2)
        .map(|w| match (w[0], w[1]) {
            (Some(prev), Some(cur)) => {
                let d = cur - prev;
                (d.is_finite() && d > 0.0).then_some(d)
            }
            _ => None,
        })
        .collect()
}

/// [`deltas`] of one metric, keyed by the later day of each pair.
pub fn dated_deltas<T, F>(series: &[T], metric: F) -> Vec<(NaiveDate, Option<f64>)>
where
    T: DatedRecord,
    F: Fn(&T) -> Option<f64>,
{
    let values: Vec<_> = series.iter().map(&metric).collect();
    series
        .iter()
        .skip(1)
        .map(DatedRecord::date)
        .zip(deltas(&values))
        .collect()
}
