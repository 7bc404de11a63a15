pub mod exclusions;
pub mod patterns;
pub mod settings;

pub use exclusions::{detect_project_type, get_default_exclusions, ProjectType};
pub use patterns::{classify_candidate, default_patterns, Candidate, KeyMatch, LineIndex, PatternRule};
pub use settings::{AuditConfig, ConfigFile, CONFIG_FILE_NAME};
