//! Raw shapes of the extracted dashboard document.
//!
//! Every series is kept as an untyped JSON value at the top level so that a
//! broken series fails on its own in `domain::contract` instead of failing the
//! whole document. Within a series, numbers and flags are coerced leniently:
//! spreadsheet cells arrive as numbers, numeric strings, blanks or dashes.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub patients: Option<Value>,

    #[serde(default)]
    pub patients_summary: Option<Value>,

    #[serde(default)]
    pub main_summary_history: Option<Value>,

    #[serde(default)]
    pub inspections_summary: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct RawSeries<T> {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,

    #[serde(default)]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDailyRecord {
    #[serde(rename = "日付", default, deserialize_with = "lenient_text")]
    pub date: Option<String>,

    #[serde(rename = "小計", default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,

    #[serde(rename = "合算", default, deserialize_with = "lenient_flag")]
    pub aggregated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStatusSnapshot {
    #[serde(rename = "更新日時", default, deserialize_with = "lenient_text")]
    pub updated_at: Option<String>,

    #[serde(rename = "検査実施人数", default, deserialize_with = "lenient_number")]
    pub tested: Option<f64>,

    #[serde(rename = "陽性患者数", default, deserialize_with = "lenient_number")]
    pub positive: Option<f64>,

    #[serde(rename = "入院中", default, deserialize_with = "lenient_number")]
    pub hospitalized: Option<f64>,

    #[serde(rename = "軽症中等症", default, deserialize_with = "lenient_number")]
    pub mild: Option<f64>,

    #[serde(rename = "重症", default, deserialize_with = "lenient_number")]
    pub severe: Option<f64>,

    #[serde(rename = "転院", default, deserialize_with = "lenient_number")]
    pub transferred: Option<f64>,

    #[serde(rename = "施設入所", default, deserialize_with = "lenient_number")]
    pub isolated: Option<f64>,

    #[serde(rename = "死亡", default, deserialize_with = "lenient_number")]
    pub deceased: Option<f64>,

    #[serde(rename = "退院", default, deserialize_with = "lenient_number")]
    pub discharged: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCaseRecord {
    #[serde(rename = "発表日", alias = "リリース日", default, deserialize_with = "lenient_text")]
    pub announced: Option<String>,

    #[serde(rename = "居住地", alias = "住居地", default, deserialize_with = "lenient_text")]
    pub area: Option<String>,

    #[serde(rename = "年代・性別", default, deserialize_with = "lenient_text")]
    pub age_sex: Option<String>,

    #[serde(rename = "国籍", default, deserialize_with = "lenient_text")]
    pub nationality: Option<String>,

    #[serde(rename = "備考", default, deserialize_with = "lenient_text")]
    pub remarks: Option<String>,
}

/// Numeric cell value, or `None` for blanks and anything non-numeric.
pub fn coerce_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64().filter(|x| x.is_finite()),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok().filter(|x| x.is_finite())
        }
        _ => None,
    }
}

fn coerce_flag(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        _ => false,
    }
}

fn coerce_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(coerce_number))
}

fn lenient_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().is_some_and(coerce_flag))
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(coerce_text))
}
