use crate::domain::record::{DailyRecord, MainStatusSnapshot};

pub const DEFAULT_WINDOW: usize = 7;

/// Right-aligned moving average.
///
/// Position `i` gets the mean of positions `i + 1 - window ..= i` only when
/// all of them hold a finite value; a partial window stays absent.
pub fn trailing_average(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }

            let mut sum = 0.0;
            for v in &values[i + 1 - window..=i] {
                match v {
                    Some(x) if x.is_finite() => sum += x,
                    _ => return None,
                }
            }
            Some(sum / window as f64)
        })
        .collect()
}

pub fn with_averages(series: &[DailyRecord], window: usize) -> Vec<DailyRecord> {
    let values: Vec<_> = series.iter().map(|r| r.value).collect();
    series
        .iter()
        .zip(trailing_average(&values, window))
        .map(|(r, average)| DailyRecord {
            average,
            ..r.clone()
        })
        .collect()
}

/// Averages `入院中` over the snapshots that report it, so a missing report
/// neither breaks nor pads the window.
pub fn with_hospitalized_averages(
    history: &[MainStatusSnapshot],
    window: usize,
) -> Vec<MainStatusSnapshot> {
    let reported: Vec<usize> = history
        .iter()
        .enumerate()
        .filter(|(_, s)| s.hospitalized.is_some())
        .map(|(i, _)| i)
        .collect();
    let values: Vec<_> = reported.iter().map(|&i| history[i].hospitalized).collect();

    let mut out: Vec<MainStatusSnapshot> = history
        .iter()
        .map(|s| MainStatusSnapshot {
            average: None,
            ..s.clone()
        })
        .collect();
    for (&i, average) in reported.iter().zip(trailing_average(&values, window)) {
        out[i].average = average;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 4, d).unwrap()
    }

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn needs_a_full_window() {
        let values: Vec<_> = (1..=9).map(|v| Some(v as f64)).collect();
        let avg = trailing_average(&values, 7);
        assert!(avg[..6].iter().all(Option::is_none));
        assert!(close(avg[6], 4.0));
        assert!(close(avg[7], 5.0));
        assert!(close(avg[8], 6.0));
    }

    #[test]
    fn absent_value_poisons_every_window_containing_it() {
        let mut values: Vec<_> = (1..=15).map(|v| Some(v as f64)).collect();
        values[8] = None;
        let avg = trailing_average(&values, 7);
        for (i, a) in avg.iter().enumerate() {
            let window_has_gap = i >= 6 && (i - 6..=i).contains(&8);
            let expected_present = i >= 6 && !window_has_gap;
            assert_eq!(a.is_some(), expected_present, "position {i}");
            if let Some(a) = a {
                let mean: f64 = values[i - 6..=i].iter().map(|v| v.unwrap()).sum::<f64>() / 7.0;
                assert!((a - mean).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn nan_counts_as_absent() {
        let values = vec![Some(1.0), Some(f64::NAN), Some(3.0)];
        assert_eq!(trailing_average(&values, 2), vec![None, None, None]);
    }

    #[test]
    fn zero_window_is_all_absent() {
        assert_eq!(trailing_average(&[Some(1.0)], 0), vec![None]);
    }

    #[test]
    fn daily_records_keep_their_other_fields() {
        let series: Vec<_> = (1..=7)
            .map(|d| DailyRecord::new(day(d), Some(d as f64)))
            .collect();
        let mut series = series;
        series[6] = series[6].clone().aggregated();

        let out = with_averages(&series, 7);
        assert!(out[6].is_aggregated);
        assert!(close(out[6].average, 4.0));
        assert_eq!(out[5].average, None);
    }

    #[test]
    fn hospitalized_average_skips_unreported_days() {
        let mut history: Vec<MainStatusSnapshot> = (1..=9)
            .map(|d| MainStatusSnapshot {
                date: day(d),
                hospitalized: Some(10.0 * d as f64),
                ..Default::default()
            })
            .collect();
        history[3].hospitalized = None;

        let out = with_hospitalized_averages(&history, 7);
        assert_eq!(out[3].average, None);
        // Seventh reported value is on day 8.
        assert_eq!(out[6].average, None);
        assert!(close(out[7].average, (10.0 + 20.0 + 30.0 + 50.0 + 60.0 + 70.0 + 80.0) / 7.0));
        assert!(out[8].average.is_some());
    }
}
