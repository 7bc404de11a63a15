use crate::error::{AuditError, Result};
use crate::locale::write_atomic;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::diff::MissingKeyEntry;

/// One key in a persisted `missing_keys_<lang>.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingKeyRecord {
    pub placeholder: String,
    #[serde(default, alias = "usedIn")]
    pub usage_locations: BTreeSet<PathBuf>,
}

/// `<dir>/missing_keys_<lang>.json`
pub fn report_path(dir: &Path, language: &str) -> PathBuf {
    dir.join(format!("missing_keys_{}.json", language))
}

/// Persist `entries` for `language` under `dir`, keyed by path in sorted order.
///
/// Returns the written file's path.
pub fn write_missing_report(
    dir: &Path,
    language: &str,
    entries: &[MissingKeyEntry],
) -> Result<PathBuf> {
    let path = report_path(dir, language);
    let records: BTreeMap<&str, MissingKeyRecord> = entries
        .iter()
        .map(|e| {
            (
                e.path.as_str(),
                MissingKeyRecord {
                    placeholder: e.placeholder.clone(),
                    usage_locations: e.usage_locations.clone(),
                },
            )
        })
        .collect();

    let mut text = serde_json::to_string_pretty(&records)
        .map_err(|e| AuditError::file_write(&path, e.to_string()))?;
    text.push('\n');
    write_atomic(&path, text.as_bytes())?;

    debug!(language, file = %path.display(), keys = records.len(), "wrote missing-key report");
    Ok(path)
}

/// Load the persisted report for `language`; `Ok(None)` when none exists
pub fn read_missing_report(dir: &Path, language: &str) -> Result<Option<Vec<MissingKeyEntry>>> {
    let path = report_path(dir, language);
    if !path.is_file() {
        return Ok(None);
    }

    let text = fs::read_to_string(&path).map_err(|e| AuditError::file_read(&path, e))?;
    let records: BTreeMap<String, MissingKeyRecord> =
        serde_json::from_str(&text).map_err(|e| AuditError::MissingReportParse {
            file: path.clone(),
            reason: e.to_string(),
        })?;

    Ok(Some(
        records
            .into_iter()
            .map(|(path, record)| MissingKeyEntry {
                path,
                placeholder: record.placeholder,
                usage_locations: record.usage_locations,
            })
            .collect(),
    ))
}
