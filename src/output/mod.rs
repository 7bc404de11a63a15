pub mod formatter;
pub mod simple_formatter;

use crate::AuditOutcome;

pub use formatter::{render_percent, ReportFormatter};
pub use simple_formatter::SimpleFormatter;

/// Pretty-printed JSON of a whole audit run, newline-terminated
pub fn format_json(outcome: &AuditOutcome) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(outcome)?;
    text.push('\n');
    Ok(text)
}
