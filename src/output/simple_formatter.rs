use crate::scan::CorpusScan;
use crate::{AuditOutcome, LanguageFix};

use super::formatter::render_percent;

/// Formatter for simple, machine-readable output: one `kind:...` line per finding
pub struct SimpleFormatter;

impl SimpleFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Format an audit run.
    ///
    /// Lines: `missing:<lang>:<key>`, `unresolved:<lang>:<key>`,
    /// `empty:<lang>:<key>`, `identical:<lang>:<key>`,
    /// `dynamic:<file>:<line>:<raw>`, `hardcoded:<file>:<line>:<snippet>`,
    /// `fixed:<lang>:<key>`, `coverage:<lang>:<percent>`, then
    /// `verdict:pass` or `verdict:fail`.
    pub fn format(&self, outcome: &AuditOutcome) -> String {
        let mut output = String::new();

        for language in &outcome.report.languages {
            let code = &language.language;
            for entry in &language.missing {
                output.push_str(&format!("missing:{}:{}\n", code, entry.path));
            }
            for entry in &language.unresolved {
                output.push_str(&format!("unresolved:{}:{}\n", code, entry.path));
            }
            for path in &language.empty_values {
                output.push_str(&format!("empty:{}:{}\n", code, path));
            }
            for path in &language.suspicious_identical {
                output.push_str(&format!("identical:{}:{}\n", code, path));
            }
        }

        for dynamic in &outcome.scan.dynamic_keys {
            output.push_str(&format!(
                "dynamic:{}:{}:{}\n",
                dynamic.file.display(),
                dynamic.line,
                dynamic.raw
            ));
        }

        for finding in outcome.hardcoded.values().flatten() {
            output.push_str(&format!(
                "hardcoded:{}:{}:{}\n",
                finding.file.display(),
                finding.line,
                finding.text
            ));
        }

        output.push_str(&self.format_fixes(&outcome.fixes));

        for language in outcome.final_report().languages.iter().filter(|l| !l.is_base) {
            output.push_str(&format!(
                "coverage:{}:{}\n",
                language.language,
                render_percent(language.coverage)
            ));
        }

        output.push_str(if outcome.verdict.passed {
            "verdict:pass\n"
        } else {
            "verdict:fail\n"
        });
        output
    }

    /// `fixed:<lang>:<key>` per inserted placeholder, `blocked:<lang>:<file>`
    /// per catalog left unchanged
    pub fn format_fixes(&self, fixes: &[LanguageFix]) -> String {
        let mut output = String::new();
        for fix in fixes {
            if fix.blocked.is_some() {
                output.push_str(&format!("blocked:{}:{}\n", fix.language, fix.file.display()));
            }
            for key in &fix.inserted {
                output.push_str(&format!("fixed:{}:{}\n", fix.language, key));
            }
        }
        output
    }

    /// `key<TAB>file,file` per extracted key, in key order
    pub fn format_keys(&self, scan: &CorpusScan) -> String {
        let mut output = String::new();
        for (key, files) in &scan.usages {
            let files: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
            output.push_str(&format!("{}\t{}\n", key, files.join(",")));
        }
        output
    }
}

impl Default for SimpleFormatter {
    fn default() -> Self {
        Self::new()
    }
}
