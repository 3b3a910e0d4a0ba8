use anyhow::{bail, Context};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// One week window, inclusive at both ends at day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl WeekRange {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }
}

/// Builds contiguous week windows covering `begin..=end`.
///
/// The first window starts on the closest `week_start` on or before `begin`.
/// Each window ends the day before the next one starts. Empty when
/// `end < begin`.
pub fn build_week_ranges(begin: NaiveDate, end: NaiveDate, week_start: Weekday) -> Vec<WeekRange> {
    if end < begin {
        return Vec::new();
    }

    let offset = (7 + begin.weekday().num_days_from_sunday() - week_start.num_days_from_sunday()) % 7;
    let mut from = begin - Duration::days(i64::from(offset));

    let mut out = Vec::new();
    loop {
        let next = from + Duration::days(7);
        let to = next - Duration::days(1);
        out.push(WeekRange { from, to });
        if to >= end {
            break;
        }
        from = next;
    }

    out
}

/// Index of the range containing `day`. Ranges must be sorted and disjoint.
pub fn locate(ranges: &[WeekRange], day: NaiveDate) -> Option<usize> {
    let idx = ranges.partition_point(|r| r.to < day);
    ranges
        .get(idx)
        .filter(|r| r.contains(day))
        .map(|_| idx)
}

/// Parses a configured week start: `0..=6` counted from Sunday (`7` is also
/// Sunday), or a weekday name such as `mon` / `Monday`.
pub fn parse_week_start(s: &str) -> anyhow::Result<Weekday> {
    let s = s.trim();
    if let Ok(n) = s.parse::<u8>() {
        return match n {
            0 | 7 => Ok(Weekday::Sun),
            1 => Ok(Weekday::Mon),
            2 => Ok(Weekday::Tue),
            3 => Ok(Weekday::Wed),
            4 => Ok(Weekday::Thu),
            5 => Ok(Weekday::Fri),
            6 => Ok(Weekday::Sat),
            _ => bail!("week start must be 0..=6 (got {n})"),
        };
    }

    s.parse::<Weekday>()
        .ok()
        .with_context(|| format!("invalid week start: {s:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn shifts_back_to_preceding_week_start() {
        // 2020-02-04 is a Tuesday.
        let ranges = build_week_ranges(day(2020, 2, 4), day(2020, 2, 20), Weekday::Mon);
        assert_eq!(ranges[0].from, day(2020, 2, 3));
        assert_eq!(ranges[0].to, day(2020, 2, 9));
        assert_eq!(ranges.last().unwrap().to, day(2020, 2, 23));
        assert_eq!(ranges.len(), 3);
    }

    #[test]
    fn zero_offset_when_begin_is_week_start() {
        let ranges = build_week_ranges(day(2020, 2, 3), day(2020, 2, 3), Weekday::Mon);
        assert_eq!(
            ranges,
            vec![WeekRange {
                from: day(2020, 2, 3),
                to: day(2020, 2, 9)
            }]
        );
    }

    #[test]
    fn sunday_start_from_saturday_goes_back_six_days() {
        // 2020-01-25 is a Saturday.
        let ranges = build_week_ranges(day(2020, 1, 25), day(2020, 5, 4), Weekday::Sun);
        assert_eq!(ranges[0].from, day(2020, 1, 19));
        assert!(ranges.iter().all(|r| r.from.weekday() == Weekday::Sun));
    }

    #[test]
    fn ranges_are_contiguous_and_cover_every_day_once() {
        for week_start in [Weekday::Sun, Weekday::Mon, Weekday::Thu, Weekday::Sat] {
            let begin = day(2020, 1, 23);
            let end = day(2020, 6, 30);
            let ranges = build_week_ranges(begin, end, week_start);

            for pair in ranges.windows(2) {
                assert_eq!(pair[0].to + Duration::days(1), pair[1].from);
                assert!(pair[0].from <= pair[0].to);
            }

            for d in begin.iter_days().take_while(|d| *d <= end) {
                let hits = ranges.iter().filter(|r| r.contains(d)).count();
                assert_eq!(hits, 1, "{d} with {week_start:?}");
                assert!(locate(&ranges, d).is_some());
            }
        }
    }

    #[test]
    fn empty_when_end_precedes_begin() {
        assert!(build_week_ranges(day(2020, 3, 2), day(2020, 3, 1), Weekday::Mon).is_empty());
    }

    #[test]
    fn locate_misses_days_outside_ranges() {
        let ranges = build_week_ranges(day(2020, 3, 2), day(2020, 3, 10), Weekday::Mon);
        assert_eq!(locate(&ranges, day(2020, 3, 1)), None);
        assert_eq!(locate(&ranges, day(2020, 3, 2)), Some(0));
        assert_eq!(locate(&ranges, day(2020, 3, 15)), Some(1));
        assert_eq!(locate(&ranges, day(2020, 3, 16)), None);
    }

    #[test]
    fn parses_numeric_and_named_week_starts() {
        assert_eq!(parse_week_start("0").unwrap(), Weekday::Sun);
        assert_eq!(parse_week_start("7").unwrap(), Weekday::Sun);
        assert_eq!(parse_week_start("1").unwrap(), Weekday::Mon);
        assert_eq!(parse_week_start("Monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_week_start("sat").unwrap(), Weekday::Sat);
        assert!(parse_week_start("9").is_err());
        assert!(parse_week_start("someday").is_err());
    }
}
