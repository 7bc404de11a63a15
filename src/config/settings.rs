use crate::error::{AuditError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::exclusions::{detect_project_type, get_default_exclusions};

/// File name looked up in the project root when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "i18n-audit.toml";

/// Everything one audit run needs, passed explicitly to the orchestrator
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Project root; every other relative path is resolved against it
    pub project_root: PathBuf,
    /// Corpus root scanned for key usages
    pub source_dir: PathBuf,
    /// Directory holding `<lang>.json` / `<lang>.yml` catalogs
    pub locales_dir: PathBuf,
    /// Where `missing_keys_<lang>.json` reports are written and read
    pub report_dir: PathBuf,
    pub languages: Vec<String>,
    pub base_language: String,
    /// Source extensions scanned for keys (without the dot)
    pub include_extensions: Vec<String>,
    /// Directory names pruned from every walk
    pub exclusions: Vec<String>,
    /// Globs (relative to the project root) scanned for hardcoded text
    pub hardcoded_globs: Vec<String>,
    pub scan_hardcoded: bool,
    /// Also treat keys used in code but absent from a catalog as gaps to fill
    pub include_unresolved: bool,
    pub fail_on_hardcoded: bool,
    pub fail_on_suspicious: bool,
    /// Number of missing keys listed per language in the summary
    pub preview_limit: usize,
}

impl AuditConfig {
    /// Defaults for a project rooted at `project_root`, with exclusions picked
    /// from the detected project type
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let exclusions = get_default_exclusions(detect_project_type(&project_root))
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            source_dir: PathBuf::from("src"),
            locales_dir: PathBuf::from("src/i18n/locales"),
            report_dir: PathBuf::from("i18n-reports"),
            languages: vec!["fr".to_string(), "en".to_string(), "he".to_string()],
            base_language: "fr".to_string(),
            include_extensions: ["js", "jsx", "ts", "tsx"].map(String::from).to_vec(),
            exclusions,
            hardcoded_globs: vec!["src/**/*.{js,jsx}".to_string()],
            scan_hardcoded: true,
            include_unresolved: false,
            fail_on_hardcoded: true,
            fail_on_suspicious: false,
            preview_limit: 20,
            project_root,
        }
    }

    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    pub fn with_locales_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.locales_dir = dir.into();
        self
    }

    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_base_language(mut self, base: impl Into<String>) -> Self {
        self.base_language = base.into();
        self
    }

    pub fn with_include_extensions(mut self, extensions: Vec<String>) -> Self {
        self.include_extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect();
        self
    }

    pub fn with_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions.extend(exclusions);
        self
    }

    pub fn with_hardcoded_globs(mut self, globs: Vec<String>) -> Self {
        self.hardcoded_globs = globs;
        self
    }

    pub fn with_scan_hardcoded(mut self, value: bool) -> Self {
        self.scan_hardcoded = value;
        self
    }

    pub fn with_include_unresolved(mut self, value: bool) -> Self {
        self.include_unresolved = value;
        self
    }

    pub fn with_fail_on_hardcoded(mut self, value: bool) -> Self {
        self.fail_on_hardcoded = value;
        self
    }

    pub fn with_fail_on_suspicious(mut self, value: bool) -> Self {
        self.fail_on_suspicious = value;
        self
    }

    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit;
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    pub fn source_root(&self) -> PathBuf {
        self.resolve(&self.source_dir)
    }

    pub fn locales_root(&self) -> PathBuf {
        self.resolve(&self.locales_dir)
    }

    pub fn report_root(&self) -> PathBuf {
        self.resolve(&self.report_dir)
    }

    /// Reject configurations that cannot produce a meaningful audit
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(AuditError::Config("at least one language is required".into()));
        }
        if !self.languages.contains(&self.base_language) {
            return Err(AuditError::Config(format!(
                "base language '{}' is not among the audited languages ({})",
                self.base_language,
                self.languages.join(", ")
            )));
        }
        if self.include_extensions.is_empty() {
            return Err(AuditError::Config("no source extensions to scan".into()));
        }
        Ok(())
    }

    /// Overlay values present in a config file
    pub fn apply_file(mut self, file: ConfigFile) -> Self {
        if let Some(v) = file.source_dir {
            self.source_dir = v;
        }
        if let Some(v) = file.locales_dir {
            self.locales_dir = v;
        }
        if let Some(v) = file.report_dir {
            self.report_dir = v;
        }
        if let Some(v) = file.languages {
            self.languages = v;
        }
        if let Some(v) = file.base_language {
            self.base_language = v;
        }
        if let Some(v) = file.include_extensions {
            self = self.with_include_extensions(v);
        }
        if let Some(v) = file.exclude {
            self = self.with_exclusions(v);
        }
        if let Some(v) = file.hardcoded_globs {
            self.hardcoded_globs = v;
        }
        if let Some(v) = file.scan_hardcoded {
            self.scan_hardcoded = v;
        }
        if let Some(v) = file.include_unresolved {
            self.include_unresolved = v;
        }
        if let Some(v) = file.fail_on_hardcoded {
            self.fail_on_hardcoded = v;
        }
        if let Some(v) = file.fail_on_suspicious {
            self.fail_on_suspicious = v;
        }
        if let Some(v) = file.preview_limit {
            self.preview_limit = v;
        }
        self
    }
}

/// On-disk `i18n-audit.toml`; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub source_dir: Option<PathBuf>,
    pub locales_dir: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
    pub languages: Option<Vec<String>>,
    pub base_language: Option<String>,
    pub include_extensions: Option<Vec<String>>,
    /// Extra directory names to exclude, added to the defaults
    pub exclude: Option<Vec<String>>,
    pub hardcoded_globs: Option<Vec<String>>,
    pub scan_hardcoded: Option<bool>,
    pub include_unresolved: Option<bool>,
    pub fail_on_hardcoded: Option<bool>,
    pub fail_on_suspicious: Option<bool>,
    pub preview_limit: Option<usize>,
}

impl ConfigFile {
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text)
            .map_err(|e| AuditError::Config(format!("{}: {}", origin.display(), e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| AuditError::file_read(path, e))?;
        Self::parse(&text, path)
    }

    /// Load `i18n-audit.toml` from the project root if it exists
    pub fn discover(project_root: &Path) -> Result<Option<Self>> {
        let path = project_root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }
}
