use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Stage of an audit run, used to tag fatal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStage {
    Scan,
    ExtractKeys,
    ScanHardcoded,
    LoadTrees,
    Diff,
    AutoFix,
    Report,
}

impl fmt::Display for AuditStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuditStage::Scan => "scan",
            AuditStage::ExtractKeys => "key extraction",
            AuditStage::ScanHardcoded => "hardcoded-text scan",
            AuditStage::LoadTrees => "locale loading",
            AuditStage::Diff => "diff",
            AuditStage::AutoFix => "auto-fix",
            AuditStage::Report => "report",
        };
        f.write_str(name)
    }
}

/// Custom error type for audit operations
#[derive(Debug, Error)]
pub enum AuditError {
    /// A locale document is not well-formed structured data
    #[error("Failed to parse locale '{language}' ({file}):\n{reason}\n\nTip: Verify the file syntax is correct")]
    LocaleParse {
        language: String,
        file: PathBuf,
        reason: String,
    },

    /// A source or locale file could not be read
    #[error("Failed to read {file}: {source}")]
    FileRead {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A locale or report file could not be written; the previous content is untouched
    #[error("Failed to write {file}: {reason}")]
    FileWrite { file: PathBuf, reason: String },

    /// Inserting a key would descend through an existing leaf value
    #[error("Cannot set '{path}': '{blocking_segment}' already holds a value\n\nTip: Two keys disagree on whether '{blocking_segment}' is a section or a string")]
    StructuralConflict {
        path: String,
        blocking_segment: String,
    },

    /// A key path is empty or has an empty segment
    #[error("Invalid key path '{0}'")]
    InvalidKeyPath(String),

    /// A matcher rule or glob could not be compiled
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The requested language has no locale file
    #[error("No locale file for language '{language}' in {dir}\n\nTip: Expected {language}.json, {language}.yml or {language}.yaml")]
    UnknownLanguage { language: String, dir: PathBuf },

    /// A persisted missing-key report could not be parsed
    #[error("Failed to parse missing-key report {file}: {reason}")]
    MissingReportParse { file: PathBuf, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Fatal error raised during a given stage
    #[error("{stage} aborted: {source}")]
    Stage {
        stage: AuditStage,
        #[source]
        source: Box<AuditError>,
    },
}

impl AuditError {
    /// Create a LocaleParse error
    pub fn locale_parse(
        language: impl Into<String>,
        file: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::LocaleParse {
            language: language.into(),
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileRead error
    pub fn file_read(file: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            file: file.into(),
            source,
        }
    }

    /// Create a FileWrite error
    pub fn file_write(file: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FileWrite {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a StructuralConflict error
    pub fn structural_conflict(
        path: impl Into<String>,
        blocking_segment: impl Into<String>,
    ) -> Self {
        Self::StructuralConflict {
            path: path.into(),
            blocking_segment: blocking_segment.into(),
        }
    }

    /// Tag this error with the stage it aborted
    pub fn in_stage(self, stage: AuditStage) -> Self {
        match self {
            already @ Self::Stage { .. } => already,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error aborted, if tagged
    pub fn stage(&self) -> Option<AuditStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type alias for AuditError
pub type Result<T> = std::result::Result<T, AuditError>;
