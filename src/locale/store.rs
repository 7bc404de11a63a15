use crate::error::{AuditError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use super::format::LocaleFormat;
use super::tree::LocaleTree;

/// A language's catalog together with where and how it is persisted
#[derive(Debug, Clone)]
pub struct LocaleFile {
    pub language: String,
    pub path: PathBuf,
    pub format: LocaleFormat,
    pub tree: LocaleTree,
    /// The file on disk has comments; rewriting it from `tree` would drop them
    pub has_comments: bool,
}

impl LocaleFile {
    /// Read and parse one catalog file
    pub fn load(language: &str, path: &Path) -> Result<Self> {
        let format = LocaleFormat::from_path(path).ok_or_else(|| {
            AuditError::locale_parse(language, path, "Unsupported file extension")
        })?;
        let text = fs::read_to_string(path).map_err(|e| AuditError::file_read(path, e))?;
        let tree = format
            .load(&text)
            .map_err(|reason| AuditError::locale_parse(language, path, reason))?;

        let has_comments = format.has_comments(&text);

        debug!(language, file = %path.display(), keys = tree.leaf_count(), has_comments, "loaded locale");

        Ok(Self {
            language: language.to_string(),
            path: path.to_path_buf(),
            format,
            tree,
            has_comments,
        })
    }

    /// Serialize `tree` in this file's format and replace the file atomically
    pub fn save_tree(&self, tree: &LocaleTree) -> Result<()> {
        let text = self
            .format
            .serialize(tree)
            .map_err(|reason| AuditError::file_write(&self.path, reason))?;
        write_atomic(&self.path, text.as_bytes())
    }
}

/// Directory holding one catalog per language (`<lang>.json`, `<lang>.yml`, ...)
#[derive(Debug, Clone)]
pub struct LocaleStore {
    dir: PathBuf,
}

impl LocaleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Find the catalog file for `language`
    pub fn locate(&self, language: &str) -> Result<PathBuf> {
        LocaleFormat::candidate_extensions()
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", language, ext)))
            .find(|p| p.is_file())
            .ok_or_else(|| AuditError::UnknownLanguage {
                language: language.to_string(),
                dir: self.dir.clone(),
            })
    }

    pub fn load(&self, language: &str) -> Result<LocaleFile> {
        let path = self.locate(language)?;
        LocaleFile::load(language, &path)
    }

    /// Load every language, stopping at the first failure
    pub fn load_all(&self, languages: &[String]) -> Result<Vec<LocaleFile>> {
        languages.iter().map(|lang| self.load(lang)).collect()
    }
}

/// Write `contents` to a sibling temp file, then rename it over `path`.
///
/// On any failure the previous file content is left untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| AuditError::file_write(path, e.to_string()))?;

    let mut tmp =
        NamedTempFile::new_in(&parent).map_err(|e| AuditError::file_write(path, e.to_string()))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.flush())
        .map_err(|e| AuditError::file_write(path, e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| AuditError::file_write(path, e.error.to_string()))?;
    Ok(())
}
