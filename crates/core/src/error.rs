use std::fmt;

/// A series that cannot be normalized: missing, empty, or carrying an
/// unparseable date. Raised per series so unrelated series keep rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedInput {
    pub series: &'static str,
    pub detail: String,
}

impl MalformedInput {
    pub fn new(series: &'static str, detail: impl Into<String>) -> Self {
        Self {
            series,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for MalformedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed input (series={}): {}", self.series, self.detail)
    }
}

impl std::error::Error for MalformedInput {}

pub fn malformed(series: &'static str, detail: impl Into<String>) -> anyhow::Error {
    anyhow::Error::new(MalformedInput::new(series, detail))
}

/// Keeps a `MalformedInput` as is; anything else is attributed to `series`.
pub fn into_malformed(series: &'static str, err: anyhow::Error) -> MalformedInput {
    match err.downcast::<MalformedInput>() {
        Ok(diag) => diag,
        Err(other) => MalformedInput::new(series, format!("{other:#}")),
    }
}
