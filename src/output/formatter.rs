use crate::audit::{CompletenessReport, LanguageReport, MissingKeyEntry};
use crate::{AuditOutcome, LanguageFix, Verdict};
use colored::*;
use std::fmt::Write;

/// Formatter for the human-readable audit summary
pub struct ReportFormatter {
    preview_limit: usize,
    max_width: usize,
}

impl ReportFormatter {
    /// Create a new ReportFormatter listing up to 20 keys per section
    pub fn new() -> Self {
        Self {
            preview_limit: 20,
            max_width: 100,
        }
    }

    /// Create a ReportFormatter with a custom preview cap
    pub fn with_preview_limit(preview_limit: usize) -> Self {
        Self {
            preview_limit,
            ..Self::new()
        }
    }

    /// Format a whole audit run
    pub fn format(&self, outcome: &AuditOutcome) -> String {
        let mut output = String::new();
        let report = &outcome.report;

        let _ = writeln!(
            output,
            "{} (base: {}, {} keys, {} source files, {} keys used)",
            "i18n audit".bold(),
            report.base_language,
            report.base_key_count,
            outcome.scan.files_scanned,
            outcome.scan.key_count()
        );

        for language in &report.languages {
            output.push('\n');
            self.format_language(language, &mut output);
        }

        if !outcome.scan.dynamic_keys.is_empty() {
            let _ = writeln!(
                output,
                "\n{} {} (built at runtime, not checked)",
                "Dynamic keys:".yellow(),
                outcome.scan.dynamic_keys.len()
            );
            for dynamic in outcome.scan.dynamic_keys.iter().take(self.preview_limit) {
                let _ = writeln!(
                    output,
                    "  {}:{} {}",
                    dynamic.file.display(),
                    dynamic.line,
                    dynamic.raw
                );
            }
            self.format_overflow(outcome.scan.dynamic_keys.len(), &mut output);
        }

        let findings: Vec<_> = outcome.hardcoded.values().flatten().collect();
        let _ = writeln!(
            output,
            "\n{} {} finding(s) in {} file(s) (heuristic)",
            "Hardcoded text:".bold(),
            findings.len(),
            outcome.hardcoded.len()
        );
        for finding in findings.iter().take(self.preview_limit) {
            let _ = writeln!(
                output,
                "  {}:{} {}",
                finding.file.display(),
                finding.line,
                self.truncate(&finding.text, self.max_width - 30).yellow()
            );
        }
        self.format_overflow(findings.len(), &mut output);

        if !outcome.written_reports.is_empty() {
            let _ = writeln!(output, "\n{}", "Missing-key reports written:".bold());
            for path in &outcome.written_reports {
                let _ = writeln!(output, "  {}", path.display());
            }
        }

        if let Some(fixed) = &outcome.fixed_report {
            output.push('\n');
            output.push_str(&self.format_fixes(&outcome.fixes));
            output.push_str(&self.format_coverage(fixed, "Coverage after fix"));
        } else {
            output.push('\n');
            output.push_str(&self.format_coverage(report, "Coverage"));
        }

        output.push('\n');
        output.push_str(&self.format_verdict(&outcome.verdict));
        output
    }

    fn format_language(&self, language: &LanguageReport, output: &mut String) {
        let title = if language.is_base {
            format!("{} (base)", language.language)
        } else {
            language.language.clone()
        };
        let _ = writeln!(output, "{}  {} keys", title.bold().cyan(), language.key_count);

        if !language.is_base {
            let count = language.missing.len();
            let label = format!("missing: {}", count);
            let _ = writeln!(
                output,
                "  {}",
                if count == 0 { label.green() } else { label.red() }
            );
            self.format_entries(&language.missing, output);
        }

        if !language.unresolved.is_empty() {
            let _ = writeln!(
                output,
                "  {}",
                format!("used in code but absent: {}", language.unresolved.len()).red()
            );
            self.format_entries(&language.unresolved, output);
        }

        if !language.empty_values.is_empty() {
            let _ = writeln!(
                output,
                "  {}",
                format!("empty values: {}", language.empty_values.len()).yellow()
            );
            for path in language.empty_values.iter().take(self.preview_limit) {
                let _ = writeln!(output, "    - {}", path);
            }
            self.format_overflow(language.empty_values.len(), output);
        }

        if !language.suspicious_identical.is_empty() {
            let _ = writeln!(
                output,
                "  {}",
                format!(
                    "identical to base (heuristic): {}",
                    language.suspicious_identical.len()
                )
                .yellow()
            );
            for path in language.suspicious_identical.iter().take(self.preview_limit) {
                let _ = writeln!(output, "    - {}", path);
            }
            self.format_overflow(language.suspicious_identical.len(), output);
        }
    }

    fn format_entries(&self, entries: &[MissingKeyEntry], output: &mut String) {
        for entry in entries.iter().take(self.preview_limit) {
            let used_in: Vec<String> = entry
                .usage_locations
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            if used_in.is_empty() {
                let _ = writeln!(output, "    - {}", entry.path);
            } else {
                let _ = writeln!(
                    output,
                    "    - {} {}",
                    entry.path,
                    self.truncate(&format!("({})", used_in.join(", ")), self.max_width - 40)
                        .dimmed()
                );
            }
        }
        self.format_overflow(entries.len(), output);
    }

    fn format_overflow(&self, total: usize, output: &mut String) {
        if total > self.preview_limit {
            let _ = writeln!(output, "    ... and {} more", total - self.preview_limit);
        }
    }

    /// Per-language and overall coverage lines
    pub fn format_coverage(&self, report: &CompletenessReport, title: &str) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{}", format!("{}:", title).bold());
        for language in report.languages.iter().filter(|l| !l.is_base) {
            let _ = writeln!(
                output,
                "  {}: {}",
                language.language,
                render_percent(language.coverage)
            );
        }
        let _ = writeln!(output, "  overall: {}", render_percent(report.overall_coverage()));
        output
    }

    /// Summary of placeholder insertion per language
    pub fn format_fixes(&self, fixes: &[LanguageFix]) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{}", "Auto-fix:".bold());
        if fixes.is_empty() {
            let _ = writeln!(output, "  nothing to fix");
            return output;
        }
        for fix in fixes {
            if let Some(reason) = &fix.blocked {
                let _ = writeln!(
                    output,
                    "  {}: {} left unchanged, {}",
                    fix.language,
                    fix.file.display(),
                    reason
                );
                continue;
            }
            let _ = writeln!(
                output,
                "  {}: {} placeholder(s) inserted into {}{}",
                fix.language,
                fix.inserted.len(),
                fix.file.display(),
                if fix.skipped_existing > 0 {
                    format!(", {} already present", fix.skipped_existing)
                } else {
                    String::new()
                }
            );
            for conflict in &fix.conflicts {
                let first_line = conflict.lines().next().unwrap_or_default();
                let _ = writeln!(output, "    {} {}", "skipped:".red(), first_line);
            }
        }
        output
    }

    pub fn format_verdict(&self, verdict: &Verdict) -> String {
        if verdict.passed {
            format!("{}\n", "PASSED: all languages complete".green().bold())
        } else {
            let mut output = format!("{}\n", "FAILED".red().bold());
            for reason in &verdict.reasons {
                let _ = writeln!(output, "  - {}", reason);
            }
            output
        }
    }

    /// Truncate a string to fit within max length
    fn truncate(&self, s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", kept)
        }
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// `83.3%`, or `N/A` when there is nothing to measure against
pub fn render_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => "N/A".to_string(),
    }
}
