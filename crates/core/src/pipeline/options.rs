use crate::series::average::DEFAULT_WINDOW;
use crate::time::day::parse_day;
use crate::time::week::parse_week_start;
use chrono::{NaiveDate, Weekday};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// First day of a reporting week.
    pub week_start: Weekday,

    /// Trailing average window, in records.
    pub average_window: usize,

    /// Fixed start of the first testing-count week. The source corrected its
    /// early testing figures once; unset unless that correction still applies.
    pub inspections_first_week_from: Option<NaiveDate>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            week_start: Weekday::Mon,
            average_window: DEFAULT_WINDOW,
            inspections_first_week_from: None,
        }
    }
}

impl PipelineOptions {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values are logged and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut out = Self::default();

        if let Some(s) = lookup("WEEK_START") {
            match parse_week_start(&s) {
                Ok(w) => out.week_start = w,
                Err(err) => tracing::warn!(error = %err, "WEEK_START ignored"),
            }
        }

        if let Some(s) = lookup("AVERAGE_WINDOW") {
            match s.trim().parse::<usize>() {
                Ok(n) if n >= 1 => out.average_window = n,
                _ => tracing::warn!(value = %s, "AVERAGE_WINDOW must be a positive integer; ignored"),
            }
        }

        if let Some(s) = lookup("INSPECTIONS_FIRST_WEEK_FROM").filter(|s| !s.trim().is_empty()) {
            match parse_day(&s) {
                Ok(d) => out.inspections_first_week_from = Some(d),
                Err(err) => tracing::warn!(error = %err, "INSPECTIONS_FIRST_WEEK_FROM ignored"),
            }
        }

        out
    }
}
