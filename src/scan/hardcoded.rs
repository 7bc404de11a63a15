use crate::config::LineIndex;
use crate::error::{AuditError, Result};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::walker::relative_to;

/// Snippets containing any of these are discarded as false positives
pub const DEFAULT_ALLOW_LIST: &[&str] = &[
    "http", "className", "data-", "aria-", "id=", "key=", "ref=", "type=", "value=", "name=",
    "onClick", "onChange",
];

/// Which surface pattern produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// `title="Text"`, `alt="Text"`, `placeholder="Text"`
    Attribute,
    /// `>Welcome<`
    TextContent,
}

/// Literal text suspected of bypassing translation. Heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardcodedFinding {
    pub file: PathBuf,
    pub line: usize,
    pub text: String,
    pub kind: PatternKind,
}

/// Relative file path → findings, ordered by rule then position
pub type HardcodedReport = BTreeMap<PathBuf, Vec<HardcodedFinding>>;

#[derive(Debug, Clone)]
struct SurfaceRule {
    kind: PatternKind,
    regex: Regex,
}

fn surface_rule(kind: PatternKind, pattern: &str) -> SurfaceRule {
    match Regex::new(pattern) {
        Ok(regex) => SurfaceRule { kind, regex },
        Err(e) => unreachable!("built-in surface rule failed to compile: {}", e),
    }
}

fn default_rules() -> Vec<SurfaceRule> {
    vec![
        surface_rule(PatternKind::Attribute, r#"\balt="[A-Z][^"{]*""#),
        surface_rule(PatternKind::Attribute, r#"\bplaceholder="[A-Z][^"{]*""#),
        surface_rule(PatternKind::Attribute, r#"\btitle="[A-Z][^"{]*""#),
        surface_rule(PatternKind::TextContent, r">[A-Z][a-z]{4,}<"),
    ]
}

/// Scans UI source for human-readable literals that were not routed through
/// the translation function
pub struct HardcodedScanner {
    rules: Vec<SurfaceRule>,
    allow_list: Vec<String>,
    exclusions: Vec<String>,
}

impl Default for HardcodedScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl HardcodedScanner {
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
            allow_list: DEFAULT_ALLOW_LIST.iter().map(|s| s.to_string()).collect(),
            exclusions: Vec::new(),
        }
    }

    /// Directory names to prune while walking
    pub fn add_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions.extend(exclusions);
        self
    }

    /// Extra false-positive substrings
    pub fn add_allowed(mut self, allowed: Vec<String>) -> Self {
        self.allow_list.extend(allowed);
        self
    }

    fn is_allowed(&self, snippet: &str) -> bool {
        self.allow_list.iter().any(|a| snippet.contains(a.as_str()))
    }

    /// Surviving matches in one file's text: (line, snippet, kind)
    pub fn scan_text(&self, text: &str) -> Vec<(usize, String, PatternKind)> {
        let lines = LineIndex::new(text);
        let mut found = Vec::new();
        for rule in &self.rules {
            for m in rule.regex.find_iter(text) {
                if self.is_allowed(m.as_str()) {
                    continue;
                }
                found.push((lines.line_of(m.start()), m.as_str().to_string(), rule.kind));
            }
        }
        found
    }

    fn collect_files(&self, root: &Path, include_globs: &[String]) -> Result<Vec<PathBuf>> {
        let mut overrides = OverrideBuilder::new(root);
        for glob in include_globs {
            overrides.add(glob).map_err(|e| AuditError::InvalidPattern {
                pattern: glob.clone(),
                reason: e.to_string(),
            })?;
        }
        let overrides = overrides.build().map_err(|e| AuditError::InvalidPattern {
            pattern: include_globs.join(", "),
            reason: e.to_string(),
        })?;

        let exclusions = self.exclusions.clone();
        // Same corpus as the key walker: only the exclusion list prunes, ignore files do not
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .parents(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .overrides(overrides)
            .filter_entry(move |e| {
                let is_dir = e.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
                !(is_dir
                    && e.depth() > 0
                    && exclusions
                        .iter()
                        .any(|ex| e.file_name().to_string_lossy() == ex.as_str()))
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                AuditError::file_read(root, io::Error::new(io::ErrorKind::Other, e.to_string()))
            })?;
            if entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Scan files under `root` matching `include_globs` (relative to `root`).
    ///
    /// Files without findings are omitted. Any unreadable file aborts the scan.
    pub fn scan(&self, root: &Path, include_globs: &[String]) -> Result<HardcodedReport> {
        let files = self.collect_files(root, include_globs)?;
        debug!(root = %root.display(), files = files.len(), "scanning for hardcoded text");

        let per_file: Vec<(PathBuf, Vec<HardcodedFinding>)> = files
            .par_iter()
            .map(|path| -> Result<(PathBuf, Vec<HardcodedFinding>)> {
                let text = fs::read_to_string(path).map_err(|e| AuditError::file_read(path, e))?;
                let rel = relative_to(root, path);
                let findings = self
                    .scan_text(&text)
                    .into_iter()
                    .map(|(line, text, kind)| HardcodedFinding {
                        file: rel.clone(),
                        line,
                        text,
                        kind,
                    })
                    .collect();
                Ok((rel, findings))
            })
            .collect::<Result<_>>()?;

        let report: HardcodedReport = per_file
            .into_iter()
            .filter(|(_, findings)| !findings.is_empty())
            .collect();

        info!(
            files = report.len(),
            findings = finding_count(&report),
            "hardcoded-text scan complete"
        );
        Ok(report)
    }
}

pub fn finding_count(report: &HardcodedReport) -> usize {
    report.values().map(Vec::len).sum()
}

/// Scan `root` with the default rules and allow-list
pub fn scan_for_hardcoded_text(root: &Path, include_globs: &[String]) -> Result<HardcodedReport> {
    HardcodedScanner::new().scan(root, include_globs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippets(text: &str) -> Vec<String> {
        HardcodedScanner::new()
            .scan_text(text)
            .into_iter()
            .map(|(_, s, _)| s)
            .collect()
    }

    #[test]
    fn test_flags_text_content() {
        assert_eq!(snippets("<h1>Welcome</h1>"), vec![">Welcome<"]);
    }

    #[test]
    fn test_short_or_lowercase_text_not_flagged() {
        assert!(snippets("<b>Home</b>").is_empty());
        assert!(snippets("<p>welcome</p>").is_empty());
    }

    #[test]
    fn test_class_name_not_flagged() {
        assert!(snippets(r#"<div className="Container">"#).is_empty());
    }

    #[test]
    fn test_flags_attributes() {
        let found = snippets(r#"<img alt="Company logo" /><input placeholder="Your email" title={t('a.b')} />"#);
        assert_eq!(found, vec![r#"alt="Company logo""#, r#"placeholder="Your email""#]);
    }

    #[test]
    fn test_allow_list_discards_urls() {
        assert!(snippets(r#"<a title="See https://example.com">"#).is_empty());
    }

    #[test]
    fn test_order_is_by_rule_then_position() {
        let text = "<p>Second</p>\n<img title=\"First\" />";
        let found = HardcodedScanner::new().scan_text(text);
        assert_eq!(found[0], (2, "title=\"First\"".to_string(), PatternKind::Attribute));
        assert_eq!(found[1], (1, ">Second<".to_string(), PatternKind::TextContent));
    }
}
