use crate::error::{AuditError, Result};
use crate::locale::{LocaleNode, LocaleTree};
use crate::scan::KeyUsageMap;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::placeholder::placeholder_for;

/// A key a language lacks, with what auto-fix would insert and where it is used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingKeyEntry {
    pub path: String,
    pub placeholder: String,
    pub usage_locations: BTreeSet<PathBuf>,
}

impl MissingKeyEntry {
    fn new(path: &str, language: &str, usages: Option<&KeyUsageMap>) -> Self {
        Self {
            path: path.to_string(),
            placeholder: placeholder_for(path, language),
            usage_locations: usages
                .and_then(|u| u.get(path))
                .cloned()
                .unwrap_or_default(),
        }
    }
}

/// Gaps found for one language
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageReport {
    pub language: String,
    pub is_base: bool,
    /// Number of leaves in this language's tree
    pub key_count: usize,
    /// Base keys absent from this language (always empty for the base)
    pub missing: Vec<MissingKeyEntry>,
    /// Keys referenced in source but absent from this language
    pub unresolved: Vec<MissingKeyEntry>,
    pub empty_values: Vec<String>,
    /// Base keys whose value is identical to the base value. Heuristic.
    pub suspicious_identical: Vec<String>,
    /// Percentage of base keys present, one decimal; `None` when the base is empty
    pub coverage: Option<f64>,
}

/// Per-language completeness of every catalog against the base language
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessReport {
    pub base_language: String,
    pub base_key_count: usize,
    pub languages: Vec<LanguageReport>,
}

impl CompletenessReport {
    pub fn language(&self, code: &str) -> Option<&LanguageReport> {
        self.languages.iter().find(|l| l.language == code)
    }

    pub fn total_missing(&self) -> usize {
        self.languages.iter().map(|l| l.missing.len()).sum()
    }

    pub fn total_unresolved(&self) -> usize {
        self.languages.iter().map(|l| l.unresolved.len()).sum()
    }

    pub fn total_suspicious(&self) -> usize {
        self.languages.iter().map(|l| l.suspicious_identical.len()).sum()
    }

    pub fn total_empty(&self) -> usize {
        self.languages.iter().map(|l| l.empty_values.len()).sum()
    }

    /// Share of base keys present across all non-base languages, one decimal
    pub fn overall_coverage(&self) -> Option<f64> {
        let targets = self.languages.iter().filter(|l| !l.is_base).count();
        let missing: usize = self
            .languages
            .iter()
            .filter(|l| !l.is_base)
            .map(|l| l.missing.len())
            .sum();
        coverage(self.base_key_count * targets, missing)
    }
}

/// Values legitimately identical across languages: emails, numbers,
/// acronyms, and tokens of three characters or fewer
pub fn is_expected_identical(value: &str) -> bool {
    value.contains('@')
        || (!value.is_empty() && value.chars().all(|c| c.is_ascii_digit()))
        || (!value.is_empty() && value.chars().all(|c| c.is_ascii_uppercase() || c.is_whitespace()))
        || value.chars().count() <= 3
}

fn is_absent(tree: &LocaleTree, path: &str) -> bool {
    tree.get(path).map_or(true, LocaleNode::is_null)
}

/// Percentage of `base_count` keys present, rounded to one decimal
pub fn coverage(base_count: usize, missing_count: usize) -> Option<f64> {
    if base_count == 0 {
        return None;
    }
    let present = base_count.saturating_sub(missing_count) as f64;
    Some((present / base_count as f64 * 1000.0).round() / 10.0)
}

/// Diff every tree against `base_language`.
///
/// `usages`, when available, annotates missing entries with the files that
/// reference them and drives the unresolved-usage check.
pub fn diff(
    trees: &IndexMap<String, LocaleTree>,
    base_language: &str,
    usages: Option<&KeyUsageMap>,
) -> Result<CompletenessReport> {
    let base = trees
        .get(base_language)
        .ok_or_else(|| AuditError::Config(format!("no tree for base language '{}'", base_language)))?;
    let base_keys = base.key_paths();

    let languages = trees
        .iter()
        .map(|(language, tree)| {
            let is_base = language == base_language;

            let missing: Vec<MissingKeyEntry> = if is_base {
                Vec::new()
            } else {
                base_keys
                    .iter()
                    .filter(|k| is_absent(tree, k))
                    .map(|k| MissingKeyEntry::new(k, language, usages))
                    .collect()
            };

            let suspicious_identical: Vec<String> = if is_base {
                Vec::new()
            } else {
                base_keys
                    .iter()
                    .filter(|k| match (base.get_text(k), tree.get_text(k)) {
                        (Some(b), Some(v)) => b == v && !is_expected_identical(b),
                        _ => false,
                    })
                    .cloned()
                    .collect()
            };

            let unresolved: Vec<MissingKeyEntry> = usages
                .map(|u| {
                    u.keys()
                        .filter(|k| is_absent(tree, k))
                        .map(|k| MissingKeyEntry::new(k, language, usages))
                        .collect()
                })
                .unwrap_or_default();

            LanguageReport {
                language: language.clone(),
                is_base,
                key_count: tree.leaf_count(),
                coverage: coverage(base_keys.len(), missing.len()),
                missing,
                unresolved,
                empty_values: tree.empty_value_paths(),
                suspicious_identical,
            }
        })
        .collect();

    Ok(CompletenessReport {
        base_language: base_language.to_string(),
        base_key_count: base_keys.len(),
        languages,
    })
}
