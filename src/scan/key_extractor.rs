use crate::config::{classify_candidate, default_patterns, Candidate, LineIndex, PatternRule};
use crate::error::{AuditError, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::walker::{collect_source_files, relative_to};

/// Key path → source files (relative to the corpus root) that reference it
pub type KeyUsageMap = BTreeMap<String, BTreeSet<PathBuf>>;

/// A key assembled at runtime that static extraction cannot resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicKeyRef {
    pub file: PathBuf,
    pub line: usize,
    pub raw: String,
}

/// Keys found in one file, before merging
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileKeys {
    pub keys: BTreeSet<String>,
    /// (line, raw) of each dynamic key
    pub dynamic: Vec<(usize, String)>,
}

/// Result of scanning a whole corpus
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusScan {
    pub usages: KeyUsageMap,
    pub dynamic_keys: Vec<DynamicKeyRef>,
    pub files_scanned: usize,
}

impl CorpusScan {
    pub fn key_count(&self) -> usize {
        self.usages.len()
    }
}

/// `KeyExtractor` recovers every statically-determinable translation key
/// from a tree of source files by applying an ordered list of independent
/// matcher rules to each file.
pub struct KeyExtractor {
    patterns: Vec<PatternRule>,
    include_extensions: Vec<String>,
    exclusions: Vec<String>,
}

impl Default for KeyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyExtractor {
    /// Create a `KeyExtractor` with the default rules and JS/TS extensions
    pub fn new() -> Self {
        Self {
            patterns: default_patterns(),
            include_extensions: ["js", "jsx", "ts", "tsx"].map(String::from).to_vec(),
            exclusions: Vec::new(),
        }
    }

    /// Create a `KeyExtractor` with custom rules
    pub fn with_patterns(patterns: Vec<PatternRule>) -> Self {
        Self {
            patterns,
            ..Self::new()
        }
    }

    /// Set directory names to prune (e.g. `node_modules`)
    pub fn set_exclusions(&mut self, exclusions: Vec<String>) {
        self.exclusions = exclusions;
    }

    /// Set extensions (without the dot) of files to scan
    pub fn set_include_extensions(&mut self, extensions: Vec<String>) {
        self.include_extensions = extensions;
    }

    pub fn patterns(&self) -> &[PatternRule] {
        &self.patterns
    }

    /// Apply every rule to one file's text
    pub fn extract_from_text(&self, text: &str) -> FileKeys {
        let lines = LineIndex::new(text);
        let mut found = FileKeys::default();

        for rule in &self.patterns {
            for m in rule.find_keys(text, &lines) {
                match classify_candidate(&m.key) {
                    Candidate::Key(key) => {
                        found.keys.insert(key);
                    }
                    Candidate::Dynamic(raw) => found.dynamic.push((m.line, raw)),
                    Candidate::Rejected => {}
                }
            }
        }

        found.dynamic.sort();
        found.dynamic.dedup();
        found
    }

    fn extract_file(&self, path: &Path) -> Result<FileKeys> {
        let text = fs::read_to_string(path).map_err(|e| AuditError::file_read(path, e))?;
        Ok(self.extract_from_text(&text))
    }

    /// Scan every matching file under `root`
    pub fn scan_corpus(&self, root: &Path) -> Result<CorpusScan> {
        let files = self.collect_files(root)?;
        self.scan_files(root, &files)
    }

    /// Files under `root` this extractor would scan, sorted
    pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        collect_source_files(root, &self.include_extensions, &self.exclusions)
    }

    /// Extract keys from `files`, recording them relative to `root`.
    ///
    /// Files are processed in parallel; results are merged in the order of
    /// `files` so repeated scans produce identical output. Any unreadable
    /// file aborts the scan.
    pub fn scan_files(&self, root: &Path, files: &[PathBuf]) -> Result<CorpusScan> {
        debug!(root = %root.display(), files = files.len(), "scanning corpus for keys");

        let per_file: Vec<(PathBuf, FileKeys)> = files
            .par_iter()
            .map(|path| -> Result<(PathBuf, FileKeys)> {
                Ok((relative_to(root, path), self.extract_file(path)?))
            })
            .collect::<Result<_>>()?;

        let mut scan = CorpusScan {
            files_scanned: per_file.len(),
            ..CorpusScan::default()
        };

        for (file, found) in per_file {
            for key in found.keys {
                scan.usages.entry(key).or_default().insert(file.clone());
            }
            for (line, raw) in found.dynamic {
                scan.dynamic_keys.push(DynamicKeyRef {
                    file: file.clone(),
                    line,
                    raw,
                });
            }
        }

        info!(
            files = scan.files_scanned,
            keys = scan.key_count(),
            dynamic = scan.dynamic_keys.len(),
            "key extraction complete"
        );
        Ok(scan)
    }
}

/// Scan `root` with the default rules
pub fn scan_corpus(
    root: &Path,
    include_extensions: &[String],
    exclusions: &[String],
) -> Result<CorpusScan> {
    let mut extractor = KeyExtractor::new();
    extractor.set_include_extensions(include_extensions.to_vec());
    extractor.set_exclusions(exclusions.to_vec());
    extractor.scan_corpus(root)
}
