pub mod diff;
pub mod missing_report;
pub mod placeholder;

pub use diff::{
    coverage, diff, is_expected_identical, CompletenessReport, LanguageReport, MissingKeyEntry,
};
pub use missing_report::{read_missing_report, report_path, write_missing_report, MissingKeyRecord};
pub use placeholder::{
    apply_placeholders, humanize_segment, is_placeholder, placeholder_for, review_marker,
    PlaceholderOutcome,
};
