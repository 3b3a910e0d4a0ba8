//! One normalization run over the dashboard document.
//!
//! Order matters:
//! 1. drop gap fillers left by a previous run, so the run is idempotent;
//! 2. extend the case counts with zeros from their last reported day, absent
//!    or not, up to the last status day;
//! 3. trailing averages, before any padding, so fillers never sit in a window;
//! 4. pad every daily series to one record per calendar day;
//! 5. derive testing increments from the padded status history;
//! 6. weekly buckets.
//!
//! Each step is guarded per series: a failure is logged and recorded in
//! [`Diagnostics`], and the other series carry on.

use crate::domain::contract::{
    InputDocument, Validated, INSPECTIONS_SUMMARY, INSPECTION_PERSONS_SUMMARY,
    MAIN_SUMMARY_HISTORY, PATIENTS, PATIENTS_SUMMARY,
};
use crate::domain::record::{
    AreaWeeklyCount, CaseRecord, DailyRecord, DatedRecord, InspectionPersons, MainStatusSnapshot,
    Series, WeeklySummary,
};
use crate::error::{into_malformed, malformed, MalformedInput};
use crate::ingest::types::RawDocument;
use crate::pipeline::options::PipelineOptions;
use crate::series::areas::weekly_area_counts;
use crate::series::average::{with_averages, with_hospitalized_averages};
use crate::series::delta::dated_deltas;
use crate::series::gaps::{extend_with_zeros, fill_gaps, strip_placeholders};
use crate::series::weekly::{weeklize_series, Reduce};
use chrono::NaiveDate;
use serde::Serialize;

/// Gap-filled, averaged daily series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patients: Option<Series<CaseRecord>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patients_summary: Option<Series<DailyRecord>>,

    /// Days whose case count is a multi-day roll-up.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub patients_summary_aggregated_dates: Vec<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_summary_history: Option<Series<MainStatusSnapshot>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspection_persons_summary: Option<Series<InspectionPersons>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspections_summary: Option<Series<DailyRecord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patients_summary: Option<Series<WeeklySummary>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspections_summary: Option<Series<WeeklySummary>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patients_per_area: Option<Series<AreaWeeklyCount>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Series (or steps on a series) that were skipped.
    pub skipped: Vec<MalformedInput>,

    /// Records that matched no week range, by series.
    pub unmatched: Vec<(&'static str, NaiveDate)>,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.unmatched.is_empty()
    }

    fn skip(&mut self, series: &'static str, err: anyhow::Error) {
        let diag = into_malformed(series, err);
        tracing::warn!(series = diag.series, detail = %diag.detail, "normalization step skipped");
        self.skipped.push(diag);
    }

    fn note_unmatched(&mut self, series: &'static str, dates: &[NaiveDate]) {
        self.unmatched.extend(dates.iter().map(|d| (series, *d)));
    }
}

#[derive(Debug, Clone)]
pub struct Reconciled {
    pub daily: DailyDocument,
    pub weekly: WeeklyDocument,
    pub diagnostics: Diagnostics,
}

/// Validates the raw document and reconciles whatever survived.
pub fn run(raw: &RawDocument, opts: &PipelineOptions) -> Reconciled {
    let Validated { document, rejected } = raw.validate();
    let mut out = reconcile(&document, opts);
    let mut skipped = rejected;
    skipped.append(&mut out.diagnostics.skipped);
    out.diagnostics.skipped = skipped;
    out
}

pub fn reconcile(input: &InputDocument, opts: &PipelineOptions) -> Reconciled {
    let mut diag = Diagnostics::default();
    let window = opts.average_window;

    let cases = observed(&mut diag, PATIENTS_SUMMARY, input.patients_summary.as_ref());
    let history = observed(&mut diag, MAIN_SUMMARY_HISTORY, input.main_summary_history.as_ref());
    let inspections = observed(&mut diag, INSPECTIONS_SUMMARY, input.inspections_summary.as_ref());

    let cases = match (cases, history.as_ref().and_then(Series::last_date)) {
        (Some(c), Some(through)) => Some(guarded(&mut diag, PATIENTS_SUMMARY, c.clone(), || {
            Ok(c.with_data(extend_with_zeros(PATIENTS_SUMMARY, &c.data, through)?))
        })),
        (c, _) => c,
    };

    let cases = cases.map(|c| c.with_data(fill_gaps(&with_averages(&c.data, window))));
    let history =
        history.map(|h| h.with_data(fill_gaps(&with_hospitalized_averages(&h.data, window))));
    let inspections = inspections.map(|s| s.with_data(fill_gaps(&s.data)));

    let inspection_persons = history.as_ref().and_then(|h| {
        guarded(&mut diag, INSPECTION_PERSONS_SUMMARY, None, || {
            derive_inspection_persons(h, cases.as_ref()).map(Some)
        })
    });

    let patients_summary_aggregated_dates = cases
        .as_ref()
        .map(|c| {
            c.data
                .iter()
                .filter(|r| r.is_aggregated)
                .map(|r| r.date)
                .collect()
        })
        .unwrap_or_default();

    let weekly_cases = cases.as_ref().map(|c| {
        let out = weeklize_series(&c.data, opts.week_start, Reduce::Sum, None);
        diag.note_unmatched(PATIENTS_SUMMARY, &out.unmatched);
        c.with_data(out.summaries)
    });
    let weekly_inspections = inspections.as_ref().map(|s| {
        let out = weeklize_series(
            &s.data,
            opts.week_start,
            Reduce::Sum,
            opts.inspections_first_week_from,
        );
        diag.note_unmatched(INSPECTIONS_SUMMARY, &out.unmatched);
        s.with_data(out.summaries)
    });
    let patients_per_area = input.patients.as_ref().map(|p| {
        let out = weekly_area_counts(&p.data, opts.week_start);
        diag.note_unmatched(PATIENTS, &out.unmatched);
        p.with_data(out.summaries)
    });

    tracing::debug!(
        cases = cases.as_ref().map_or(0, |c| c.data.len()),
        history = history.as_ref().map_or(0, |h| h.data.len()),
        skipped = diag.skipped.len(),
        "series reconciled"
    );

    Reconciled {
        daily: DailyDocument {
            patients: input.patients.clone(),
            patients_summary: cases,
            patients_summary_aggregated_dates,
            main_summary_history: history,
            inspection_persons_summary: inspection_persons,
            inspections_summary: inspections,
        },
        weekly: WeeklyDocument {
            patients_summary: weekly_cases,
            inspections_summary: weekly_inspections,
            patients_per_area,
        },
        diagnostics: diag,
    }
}

/// Testing increments per day from the cumulative status counters. A day
/// without a reliable positives increment falls back to that day's case count.
pub fn derive_inspection_persons(
    history: &Series<MainStatusSnapshot>,
    cases: Option<&Series<DailyRecord>>,
) -> anyhow::Result<Series<InspectionPersons>> {
    if history.data.len() < 2 {
        return Err(malformed(
            INSPECTION_PERSONS_SUMMARY,
            "needs at least two status days",
        ));
    }

    let case_count = |date: NaiveDate| {
        let cases = &cases?.data;
        let idx = cases.binary_search_by_key(&date, |r| r.date).ok()?;
        cases[idx].value
    };

    let tested = dated_deltas(&history.data, |s| s.tested);
    let positive = dated_deltas(&history.data, |s| s.positive);

    let data = tested
        .into_iter()
        .zip(positive)
        .map(|((date, tested), (_, positive))| {
            let (positive, positive_is_proxy) = match positive {
                Some(p) => (Some(p), false),
                None => {
                    let proxy = case_count(date);
                    (proxy, proxy.is_some())
                }
            };
            InspectionPersons {
                date,
                tested,
                positive,
                positive_is_proxy,
            }
        })
        .collect();

    Ok(history.with_data(data))
}

/// The series without gap fillers, or `None` (recorded) when no day carries data.
fn observed<T: DatedRecord>(
    diag: &mut Diagnostics,
    series: &'static str,
    input: Option<&Series<T>>,
) -> Option<Series<T>> {
    let input = input?;
    let data = strip_placeholders(&input.data);
    if data.iter().all(DatedRecord::is_placeholder) {
        diag.skip(series, malformed(series, "series has no observed days"));
        return None;
    }
    Some(input.with_data(data))
}

fn guarded<T>(
    diag: &mut Diagnostics,
    series: &'static str,
    fallback: T,
    step: impl FnOnce() -> anyhow::Result<T>,
) -> T {
    match step() {
        Ok(v) => v,
        Err(err) => {
            diag.skip(series, err);
            fallback
        }
    }
}
