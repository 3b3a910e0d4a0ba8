use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const DAILY_FILE: &str = "daily.json";
pub const WEEKLY_FILE: &str = "weekly.json";

/// Serializes `doc` and moves it into `dir/name` via a sibling temp file, so
/// readers never observe a half-written document.
pub fn write_document<T: Serialize>(dir: &Path, name: &str, doc: &T) -> anyhow::Result<PathBuf> {
    let mut body = serde_json::to_string_pretty(doc).with_context(|| format!("serialize {name}"))?;
    body.push('\n');

    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let target = dir.join(name);
    let tmp = dir.join(format!(".{name}.tmp"));
    std::fs::write(&tmp, body.as_bytes()).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, &target)
        .with_context(|| format!("rename {} -> {}", tmp.display(), target.display()))?;

    Ok(target)
}
