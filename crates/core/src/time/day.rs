use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;

/// Parses the calendar day at the front of a source timestamp.
///
/// Accepts `YYYY-MM-DD` and `YYYY/MM/DD`, optionally followed by `T` or a space
/// and a time of day. The time (and any `Z`/offset suffix) is discarded without
/// zone conversion: the day written in the source is the day.
pub fn parse_day(text: &str) -> anyhow::Result<NaiveDate> {
    let trimmed = text.trim();
    let head = trimmed
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    let normalized = head.replace('/', "-");
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .with_context(|| format!("unparseable date: {text:?}"))
}

pub fn date_only(ts: NaiveDateTime) -> NaiveDate {
    ts.date()
}

pub fn date_only_eq(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    date_only(a) == date_only(b)
}

pub fn date_only_cmp(a: NaiveDateTime, b: NaiveDateTime) -> Ordering {
    date_only(a).cmp(&date_only(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_and_slashed_dates() {
        assert_eq!(parse_day("2020-03-01").unwrap(), day(2020, 3, 1));
        assert_eq!(parse_day("2020/03/01").unwrap(), day(2020, 3, 1));
        assert_eq!(parse_day(" 2020/3/1 ").unwrap(), day(2020, 3, 1));
    }

    #[test]
    fn strips_time_of_day_without_zone_shift() {
        // Extraction emits 08:00Z stamps; the written day is the calendar day.
        assert_eq!(
            parse_day("2020-03-01T08:00:00.000Z").unwrap(),
            day(2020, 3, 1)
        );
        assert_eq!(parse_day("2020/05/04 23:59").unwrap(), day(2020, 5, 4));
        assert_eq!(
            parse_day("2020-05-04T23:30:00+09:00").unwrap(),
            day(2020, 5, 4)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_day("").is_err());
        assert!(parse_day("不明").is_err());
        assert!(parse_day("2020-13-01").is_err());
    }

    #[test]
    fn different_times_on_same_day_compare_equal() {
        let morning = day(2020, 4, 1).and_hms_opt(0, 0, 1).unwrap();
        let night = day(2020, 4, 1).and_hms_opt(23, 59, 59).unwrap();
        let next = day(2020, 4, 2).and_hms_opt(0, 0, 0).unwrap();

        assert!(date_only_eq(morning, night));
        assert_eq!(date_only_cmp(night, morning), Ordering::Equal);
        assert_eq!(date_only_cmp(night, next), Ordering::Less);
        assert_eq!(date_only(night), day(2020, 4, 1));
    }
}
