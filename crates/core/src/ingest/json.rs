use crate::error::malformed;
use crate::ingest::types::{RawDocument, RawSeries};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parses the extracted dashboard document.
///
/// Only the top-level shape is checked here; series contents are parsed one at
/// a time by [`parse_series`].
pub fn parse_document(text: &str) -> anyhow::Result<RawDocument> {
    // Spreadsheet tooling on Windows likes to prepend a BOM.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    serde_json::from_str::<RawDocument>(text).context("input is not a valid dashboard document")
}

pub fn parse_series<T: DeserializeOwned>(
    series: &'static str,
    value: Option<&Value>,
) -> anyhow::Result<RawSeries<T>> {
    let value = match value {
        Some(Value::Null) | None => return Err(malformed(series, "series is missing")),
        Some(v) => v,
    };

    serde_json::from_value::<RawSeries<T>>(value.clone())
        .map_err(|e| malformed(series, format!("unexpected series shape: {e}")))
}
