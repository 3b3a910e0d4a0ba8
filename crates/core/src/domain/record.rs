use crate::domain::number;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// A record that belongs to exactly one calendar day of a series.
pub trait DatedRecord: Clone {
    fn date(&self) -> NaiveDate;

    /// A record for `date` with every metric absent.
    fn placeholder(date: NaiveDate) -> Self;

    /// True when the record carries no data at all, i.e. it is
    /// indistinguishable from a synthesized gap filler.
    fn is_placeholder(&self) -> bool;
}

/// A dated collection as it appears in the dashboard document: an update
/// stamp (passed through verbatim) plus the ordered records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<T> {
    pub date: String,
    pub data: Vec<T>,
}

impl<T> Series<T> {
    pub fn new(date: impl Into<String>, data: Vec<T>) -> Self {
        Self {
            date: date.into(),
            data,
        }
    }

    /// Same update stamp, new records.
    pub fn with_data<U>(&self, data: Vec<U>) -> Series<U> {
        Series {
            date: self.date.clone(),
            data,
        }
    }
}

impl<T: DatedRecord> Series<T> {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.data.first().map(DatedRecord::date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.data.last().map(DatedRecord::date)
    }

    /// Latest record that carries data.
    pub fn latest(&self) -> Option<&T> {
        self.data.iter().rev().find(|r| !r.is_placeholder())
    }
}

/// One calendar day of a daily-count series (`小計` per `日付`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    #[serde(rename = "日付")]
    pub date: NaiveDate,

    #[serde(rename = "小計", serialize_with = "number::serialize_opt")]
    pub value: Option<f64>,

    /// The value is a roll-up of several days reported on one date.
    #[serde(rename = "合算", skip_serializing_if = "is_false")]
    pub is_aggregated: bool,

    #[serde(
        rename = "平均",
        serialize_with = "number::serialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub average: Option<f64>,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self {
            date,
            value,
            is_aggregated: false,
            average: None,
        }
    }

    pub fn aggregated(mut self) -> Self {
        self.is_aggregated = true;
        self
    }
}

impl DatedRecord for DailyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn placeholder(date: NaiveDate) -> Self {
        Self::new(date, None)
    }

    fn is_placeholder(&self) -> bool {
        self.value.is_none() && !self.is_aggregated
    }
}

/// Hospitalization / severity breakdown reported on one day.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MainStatusSnapshot {
    #[serde(rename = "更新日時")]
    pub date: NaiveDate,

    #[serde(rename = "検査実施人数", serialize_with = "number::serialize_opt")]
    pub tested: Option<f64>,

    #[serde(rename = "陽性患者数", serialize_with = "number::serialize_opt")]
    pub positive: Option<f64>,

    #[serde(rename = "入院中", serialize_with = "number::serialize_opt")]
    pub hospitalized: Option<f64>,

    #[serde(rename = "軽症中等症", serialize_with = "number::serialize_opt")]
    pub mild: Option<f64>,

    #[serde(rename = "重症", serialize_with = "number::serialize_opt")]
    pub severe: Option<f64>,

    #[serde(rename = "転院", serialize_with = "number::serialize_opt")]
    pub transferred: Option<f64>,

    #[serde(rename = "施設入所", serialize_with = "number::serialize_opt")]
    pub isolated: Option<f64>,

    #[serde(rename = "死亡", serialize_with = "number::serialize_opt")]
    pub deceased: Option<f64>,

    #[serde(rename = "退院", serialize_with = "number::serialize_opt")]
    pub discharged: Option<f64>,

    /// Trailing average of `入院中`.
    #[serde(
        rename = "平均",
        serialize_with = "number::serialize_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub average: Option<f64>,
}

impl MainStatusSnapshot {
    fn counters(&self) -> [Option<f64>; 9] {
        [
            self.tested,
            self.positive,
            self.hospitalized,
            self.mild,
            self.severe,
            self.transferred,
            self.isolated,
            self.deceased,
            self.discharged,
        ]
    }
}

impl DatedRecord for MainStatusSnapshot {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn placeholder(date: NaiveDate) -> Self {
        Self {
            date,
            ..Self::default()
        }
    }

    fn is_placeholder(&self) -> bool {
        self.counters().iter().all(Option::is_none)
    }
}

/// Per-day testing increments derived from the cumulative status counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionPersons {
    #[serde(rename = "日付")]
    pub date: NaiveDate,

    #[serde(rename = "検査実施人数", serialize_with = "number::serialize_opt")]
    pub tested: Option<f64>,

    #[serde(rename = "陽性患者数", serialize_with = "number::serialize_opt")]
    pub positive: Option<f64>,

    /// `陽性患者数` is the day's case count standing in for a missing delta.
    #[serde(rename = "陽性者数代替", skip_serializing_if = "is_false")]
    pub positive_is_proxy: bool,
}

/// One row of the case line-list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    #[serde(rename = "発表日")]
    pub announced: NaiveDate,

    #[serde(rename = "居住地")]
    pub area: Option<String>,

    #[serde(rename = "年代・性別")]
    pub age_sex: Option<String>,

    #[serde(rename = "国籍")]
    pub nationality: Option<String>,

    #[serde(rename = "備考")]
    pub remarks: Option<String>,
}

/// A week of a daily series reduced to one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    #[serde(rename = "開始日")]
    pub from: NaiveDate,

    #[serde(rename = "終了日")]
    pub to: NaiveDate,

    #[serde(rename = "小計", serialize_with = "number::serialize")]
    pub value: f64,

    /// Some day of the week was itself a multi-day roll-up.
    #[serde(rename = "合算", skip_serializing_if = "is_false")]
    pub uncertain: bool,
}

/// Cases per residence area for one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaWeeklyCount {
    #[serde(rename = "開始日")]
    pub from: NaiveDate,

    #[serde(rename = "終了日")]
    pub to: NaiveDate,

    #[serde(rename = "居住地別")]
    pub counts: BTreeMap<String, u32>,
}

fn is_false(b: &bool) -> bool {
    !*b
}
