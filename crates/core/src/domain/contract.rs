use crate::domain::record::{CaseRecord, DailyRecord, MainStatusSnapshot, Series};
use crate::error::{into_malformed, malformed, MalformedInput};
use crate::ingest::json::parse_series;
use crate::ingest::types::{RawCaseRecord, RawDailyRecord, RawDocument, RawSeries, RawStatusSnapshot};
use crate::time::day::parse_day;
use chrono::NaiveDate;

pub const PATIENTS: &str = "patients";
pub const PATIENTS_SUMMARY: &str = "patients_summary";
pub const MAIN_SUMMARY_HISTORY: &str = "main_summary_history";
pub const INSPECTIONS_SUMMARY: &str = "inspections_summary";
pub const INSPECTION_PERSONS_SUMMARY: &str = "inspection_persons_summary";

/// The typed input of one normalization run. A series is `None` when it was
/// absent from the source or rejected at this boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputDocument {
    pub patients: Option<Series<CaseRecord>>,
    pub patients_summary: Option<Series<DailyRecord>>,
    pub main_summary_history: Option<Series<MainStatusSnapshot>>,
    pub inspections_summary: Option<Series<DailyRecord>>,
}

#[derive(Debug, Clone, Default)]
pub struct Validated {
    pub document: InputDocument,
    pub rejected: Vec<MalformedInput>,
}

impl RawDocument {
    /// Validates each series independently; a rejected series is reported
    /// and left out rather than failing the document.
    pub fn validate(&self) -> Validated {
        let mut rejected = Vec::new();

        let patients_summary = accept(
            &mut rejected,
            daily_series(PATIENTS_SUMMARY, self.patients_summary.as_ref()),
        );
        let main_summary_history = accept(
            &mut rejected,
            status_series(self.main_summary_history.as_ref()),
        );

        // Optional series: absence is not a defect.
        let inspections_summary = self.inspections_summary.as_ref().and_then(|v| {
            accept(&mut rejected, daily_series(INSPECTIONS_SUMMARY, Some(v)))
        });
        let patients = self
            .patients
            .as_ref()
            .and_then(|v| accept(&mut rejected, case_series(Some(v))));

        Validated {
            document: InputDocument {
                patients,
                patients_summary,
                main_summary_history,
                inspections_summary,
            },
            rejected,
        }
    }
}

fn accept<T>(rejected: &mut Vec<MalformedInput>, res: anyhow::Result<T>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(err) => {
            let diag = into_malformed("document", err);
            tracing::warn!(series = diag.series, detail = %diag.detail, "series rejected");
            rejected.push(diag);
            None
        }
    }
}

pub fn daily_series(
    series: &'static str,
    value: Option<&serde_json::Value>,
) -> anyhow::Result<Series<DailyRecord>> {
    let raw: RawSeries<RawDailyRecord> = parse_series(series, value)?;
    ensure_non_empty(series, raw.data.len())?;

    let mut data = Vec::with_capacity(raw.data.len());
    for (idx, r) in raw.data.into_iter().enumerate() {
        let date = record_date(series, idx, r.date.as_deref())?;
        if let Some(prev) = data.last().map(|p: &DailyRecord| p.date) {
            check_order(series, idx, prev, date)?;
        }
        data.push(DailyRecord {
            date,
            value: r.value,
            is_aggregated: r.aggregated,
            average: None,
        });
    }

    Ok(Series::new(raw.date.unwrap_or_default(), data))
}

/// Status snapshots are timestamped; several on one day collapse to the
/// last one reported that day.
pub fn status_series(
    value: Option<&serde_json::Value>,
) -> anyhow::Result<Series<MainStatusSnapshot>> {
    let series = MAIN_SUMMARY_HISTORY;
    let raw: RawSeries<RawStatusSnapshot> = parse_series(series, value)?;
    ensure_non_empty(series, raw.data.len())?;

    let mut data: Vec<MainStatusSnapshot> = Vec::with_capacity(raw.data.len());
    for (idx, r) in raw.data.into_iter().enumerate() {
        let date = record_date(series, idx, r.updated_at.as_deref())?;
        let snapshot = MainStatusSnapshot {
            date,
            tested: r.tested,
            positive: r.positive,
            hospitalized: r.hospitalized,
            mild: r.mild,
            severe: r.severe,
            transferred: r.transferred,
            isolated: r.isolated,
            deceased: r.deceased,
            discharged: r.discharged,
            average: None,
        };

        match data.last_mut() {
            Some(prev) if prev.date == date => {
                tracing::debug!(%date, "same-day status snapshot replaces earlier one");
                *prev = snapshot;
            }
            Some(prev) => {
                let prev = prev.date;
                check_order(series, idx, prev, date)?;
                data.push(snapshot);
            }
            None => data.push(snapshot),
        }
    }

    Ok(Series::new(raw.date.unwrap_or_default(), data))
}

/// Line-list rows without an announcement date are not cases yet and are
/// skipped; rows are sorted by announcement date.
pub fn case_series(value: Option<&serde_json::Value>) -> anyhow::Result<Series<CaseRecord>> {
    let series = PATIENTS;
    let raw: RawSeries<RawCaseRecord> = parse_series(series, value)?;

    let mut skipped = 0usize;
    let mut data = Vec::with_capacity(raw.data.len());
    for (idx, r) in raw.data.into_iter().enumerate() {
        let Some(announced) = r.announced.as_deref() else {
            skipped += 1;
            continue;
        };
        let announced = record_date(series, idx, Some(announced))?;
        data.push(CaseRecord {
            announced,
            area: r.area,
            age_sex: r.age_sex,
            nationality: r.nationality,
            remarks: r.remarks,
        });
    }
    if skipped > 0 {
        tracing::debug!(skipped, "line-list rows without announcement date skipped");
    }

    ensure_non_empty(series, data.len())?;
    data.sort_by_key(|c| c.announced);

    Ok(Series::new(raw.date.unwrap_or_default(), data))
}

fn ensure_non_empty(series: &'static str, len: usize) -> anyhow::Result<()> {
    if len == 0 {
        return Err(malformed(series, "series is empty"));
    }
    Ok(())
}

fn record_date(series: &'static str, idx: usize, text: Option<&str>) -> anyhow::Result<NaiveDate> {
    let text = text.ok_or_else(|| malformed(series, format!("record {idx} has no date")))?;
    parse_day(text).map_err(|e| malformed(series, format!("record {idx}: {e:#}")))
}

fn check_order(
    series: &'static str,
    idx: usize,
    prev: NaiveDate,
    date: NaiveDate,
) -> anyhow::Result<()> {
    if date <= prev {
        return Err(malformed(
            series,
            format!("record {idx} ({date}) does not follow {prev}; series must be ascending with one record per day"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::json::parse_document;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn document(v: serde_json::Value) -> RawDocument {
        parse_document(&v.to_string()).unwrap()
    }

    #[test]
    fn validates_all_series() {
        let doc = document(json!({
            "patients": {"date": "2020/04/02 20:00", "data": [
                {"発表日": "2020-04-02T08:00:00.000Z", "居住地": "船橋市"},
                {"発表日": null, "居住地": "市川市"},
                {"発表日": "2020-04-01T08:00:00.000Z", "居住地": "千葉市"}
            ]},
            "patients_summary": {"date": "2020/04/02 20:00", "data": [
                {"日付": "2020-04-01T08:00:00.000Z", "小計": 2},
                {"日付": "2020-04-02T08:00:00.000Z", "小計": "1", "合算": "○"}
            ]},
            "main_summary_history": {"date": "2020/04/02 20:00", "data": [
                {"更新日時": "2020/04/01 21:00", "検査実施人数": 100, "入院中": "-"},
                {"更新日時": "2020/04/02 21:00", "検査実施人数": 130, "入院中": 4}
            ]}
        }));

        let v = doc.validate();
        assert!(v.rejected.is_empty(), "{:?}", v.rejected);

        let cases = v.document.patients_summary.unwrap();
        assert_eq!(cases.date, "2020/04/02 20:00");
        assert_eq!(cases.data[0].date, day(2020, 4, 1));
        assert_eq!(cases.data[1].value, Some(1.0));
        assert!(cases.data[1].is_aggregated);

        let history = v.document.main_summary_history.unwrap();
        assert_eq!(history.data[0].hospitalized, None);
        assert_eq!(history.data[1].hospitalized, Some(4.0));

        let patients = v.document.patients.unwrap();
        assert_eq!(patients.data.len(), 2);
        assert_eq!(patients.data[0].area.as_deref(), Some("千葉市"));

        assert!(v.document.inspections_summary.is_none());
    }

    #[test]
    fn bad_date_rejects_only_that_series() {
        let doc = document(json!({
            "patients_summary": {"date": "", "data": [
                {"日付": "2020-04-01", "小計": 2},
                {"日付": "昨日", "小計": 1}
            ]},
            "main_summary_history": {"date": "", "data": [
                {"更新日時": "2020/04/01 21:00", "入院中": 3}
            ]}
        }));

        let v = doc.validate();
        assert!(v.document.patients_summary.is_none());
        assert!(v.document.main_summary_history.is_some());
        assert_eq!(v.rejected.len(), 1);
        assert_eq!(v.rejected[0].series, PATIENTS_SUMMARY);
        assert!(v.rejected[0].detail.contains("record 1"));
    }

    #[test]
    fn empty_and_missing_required_series_are_rejected() {
        let doc = document(json!({
            "patients_summary": {"date": "", "data": []}
        }));
        let v = doc.validate();
        let names: Vec<_> = v.rejected.iter().map(|r| r.series).collect();
        assert_eq!(names, vec![PATIENTS_SUMMARY, MAIN_SUMMARY_HISTORY]);
    }

    #[test]
    fn duplicate_daily_dates_are_rejected() {
        let err = daily_series(
            PATIENTS_SUMMARY,
            Some(&json!({"date": "", "data": [
                {"日付": "2020-04-01", "小計": 2},
                {"日付": "2020-04-01T10:00:00", "小計": 1}
            ]})),
        )
        .unwrap_err();
        assert!(err.downcast_ref::<MalformedInput>().is_some());
    }

    #[test]
    fn same_day_snapshots_keep_the_last() {
        let s = status_series(Some(&json!({"date": "", "data": [
            {"更新日時": "2020/04/01 09:00", "入院中": 3},
            {"更新日時": "2020/04/01 21:00", "入院中": 5},
            {"更新日時": "2020/04/03 21:00", "入院中": 6}
        ]})))
        .unwrap();
        assert_eq!(s.data.len(), 2);
        assert_eq!(s.data[0].hospitalized, Some(5.0));
    }
}
