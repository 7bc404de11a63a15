pub mod audit;
pub mod config;
pub mod error;
pub mod locale;
pub mod output;
pub mod scan;

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{debug, info, info_span, warn};

// Re-export commonly used types
pub use audit::{
    apply_placeholders, diff, placeholder_for, read_missing_report, write_missing_report,
    CompletenessReport, LanguageReport, MissingKeyEntry, PlaceholderOutcome,
};
pub use config::{AuditConfig, ConfigFile, PatternRule};
pub use error::{AuditError, AuditStage, Result};
pub use locale::{LocaleFile, LocaleFormat, LocaleNode, LocaleStore, LocaleTree};
pub use output::{ReportFormatter, SimpleFormatter};
pub use scan::{
    scan_corpus, scan_for_hardcoded_text, CorpusScan, DynamicKeyRef, HardcodedFinding,
    HardcodedReport, HardcodedScanner, KeyExtractor, KeyUsageMap,
};

/// Optional side effects of an audit run
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditOptions {
    /// Insert placeholders for every gap and rewrite the locale files
    pub fix: bool,
    /// Persist `missing_keys_<lang>.json` for a later `fix`
    pub write_missing: bool,
}

impl AuditOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fix(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }

    pub fn with_write_missing(mut self, write_missing: bool) -> Self {
        self.write_missing = write_missing;
        self
    }
}

/// What auto-fix did to one language's catalog
#[derive(Debug, Clone, Serialize)]
pub struct LanguageFix {
    pub language: String,
    pub file: PathBuf,
    pub inserted: Vec<String>,
    pub skipped_existing: usize,
    /// Rendered structural conflicts; those keys were skipped
    pub conflicts: Vec<String>,
    /// Why the file was left untouched even though placeholders were pending
    pub blocked: Option<String>,
}

impl LanguageFix {
    fn from_outcome(file: &LocaleFile, outcome: &PlaceholderOutcome) -> Self {
        Self {
            language: file.language.clone(),
            file: file.path.clone(),
            inserted: outcome.inserted.clone(),
            skipped_existing: outcome.skipped_existing,
            conflicts: outcome.conflicts.iter().map(|e| e.to_string()).collect(),
            blocked: None,
        }
    }
}

const COMMENTS_BLOCK_REWRITE: &str =
    "file has comments that a rewrite would drop; remove them or add the keys by hand";

/// Pass/fail signal and the conditions that caused a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub passed: bool,
    pub reasons: Vec<String>,
}

impl Verdict {
    /// Judge `report` and `hardcoded` against the failure conditions enabled in `config`
    pub fn judge(
        config: &AuditConfig,
        report: &CompletenessReport,
        hardcoded: &HardcodedReport,
    ) -> Self {
        let mut reasons = Vec::new();

        let missing = report.total_missing();
        if missing > 0 {
            reasons.push(format!("{} missing key(s) across languages", missing));
        }
        if config.include_unresolved {
            let unresolved = report.total_unresolved();
            if unresolved > 0 {
                reasons.push(format!("{} key(s) used in code but absent from a catalog", unresolved));
            }
        }
        let findings = scan::finding_count(hardcoded);
        if config.fail_on_hardcoded && findings > 0 {
            reasons.push(format!("{} possible hardcoded text(s)", findings));
        }
        let suspicious = report.total_suspicious();
        if config.fail_on_suspicious && suspicious > 0 {
            reasons.push(format!("{} value(s) identical to the base language", suspicious));
        }

        Self {
            passed: reasons.is_empty(),
            reasons,
        }
    }
}

/// Result of an audit run
#[derive(Debug, Serialize)]
pub struct AuditOutcome {
    pub scan: CorpusScan,
    pub hardcoded: HardcodedReport,
    /// Completeness as found on disk
    pub report: CompletenessReport,
    /// Completeness after placeholders were written, when `fix` ran
    pub fixed_report: Option<CompletenessReport>,
    pub fixes: Vec<LanguageFix>,
    pub written_reports: Vec<PathBuf>,
    pub verdict: Verdict,
}

impl AuditOutcome {
    /// The report the verdict was computed from
    pub fn final_report(&self) -> &CompletenessReport {
        self.fixed_report.as_ref().unwrap_or(&self.report)
    }
}

/// Gaps to close for one language: missing base keys, plus unresolved
/// usages when enabled, deduplicated by path
fn gaps_for(language: &LanguageReport, include_unresolved: bool) -> Vec<MissingKeyEntry> {
    let mut seen = BTreeSet::new();
    let extra = if include_unresolved {
        language.unresolved.as_slice()
    } else {
        &[]
    };
    language
        .missing
        .iter()
        .chain(extra)
        .filter(|e| seen.insert(e.path.clone()))
        .cloned()
        .collect()
}

fn trees_of(files: &[LocaleFile]) -> IndexMap<String, LocaleTree> {
    files
        .iter()
        .map(|f| (f.language.clone(), f.tree.clone()))
        .collect()
}

/// Apply `entries` to `file` and rewrite it if anything was inserted.
///
/// A file with comments is never rewritten; the pending keys are reported
/// through [`LanguageFix::blocked`] and stay missing.
fn fix_file(file: &mut LocaleFile, entries: &[MissingKeyEntry]) -> Result<LanguageFix> {
    let outcome = apply_placeholders(&file.tree, entries, &file.language);
    let mut fix = LanguageFix::from_outcome(file, &outcome);
    if outcome.changed() && file.has_comments {
        warn!(
            language = %file.language,
            file = %file.path.display(),
            pending = outcome.inserted_count(),
            "not rewriting locale with comments"
        );
        fix.inserted.clear();
        fix.blocked = Some(COMMENTS_BLOCK_REWRITE.to_string());
        return Ok(fix);
    }
    if outcome.changed() {
        file.save_tree(&outcome.tree)?;
        info!(
            language = %file.language,
            file = %file.path.display(),
            inserted = outcome.inserted_count(),
            "locale updated"
        );
        file.tree = outcome.tree;
    }
    Ok(fix)
}

/// Run a full audit: scan the corpus, load every catalog, diff against the
/// base language, and optionally persist reports and fill gaps.
///
/// IO and parse failures abort the run tagged with the stage they occurred
/// in. Structural conflicts during auto-fix are reported per key in
/// [`AuditOutcome::fixes`] and do not abort.
#[must_use = "this function returns a Result that should be handled"]
pub fn run_audit(config: &AuditConfig, options: AuditOptions) -> Result<AuditOutcome> {
    config.validate()?;

    let source_root = config.source_root();
    let mut extractor = KeyExtractor::new();
    extractor.set_include_extensions(config.include_extensions.clone());
    extractor.set_exclusions(config.exclusions.clone());

    let files = info_span!("scan")
        .in_scope(|| extractor.collect_files(&source_root))
        .map_err(|e| e.in_stage(AuditStage::Scan))?;

    let scan = info_span!("extract_keys")
        .in_scope(|| extractor.scan_files(&source_root, &files))
        .map_err(|e| e.in_stage(AuditStage::ExtractKeys))?;

    let hardcoded = if config.scan_hardcoded {
        info_span!("scan_hardcoded")
            .in_scope(|| {
                HardcodedScanner::new()
                    .add_exclusions(config.exclusions.clone())
                    .scan(&config.project_root, &config.hardcoded_globs)
            })
            .map_err(|e| e.in_stage(AuditStage::ScanHardcoded))?
    } else {
        HardcodedReport::new()
    };

    let store = LocaleStore::new(config.locales_root());
    let mut locale_files = info_span!("load_trees")
        .in_scope(|| store.load_all(&config.languages))
        .map_err(|e| e.in_stage(AuditStage::LoadTrees))?;

    let report = info_span!("diff")
        .in_scope(|| diff(&trees_of(&locale_files), &config.base_language, Some(&scan.usages)))
        .map_err(|e| e.in_stage(AuditStage::Diff))?;

    let mut written_reports = Vec::new();
    if options.write_missing {
        let _span = info_span!("write_reports").entered();
        let report_root = config.report_root();
        // Written even when empty so an earlier run's gaps are not reapplied
        for language in &report.languages {
            let gaps = gaps_for(language, config.include_unresolved);
            let path = write_missing_report(&report_root, &language.language, &gaps)
                .map_err(|e| e.in_stage(AuditStage::Report))?;
            written_reports.push(path);
        }
    }

    let mut fixes = Vec::new();
    let mut fixed_report = None;
    if options.fix {
        let _span = info_span!("auto_fix").entered();
        for file in locale_files.iter_mut() {
            let gaps = report
                .language(&file.language)
                .map(|l| gaps_for(l, config.include_unresolved))
                .unwrap_or_default();
            if gaps.is_empty() {
                continue;
            }
            let fix = fix_file(file, &gaps).map_err(|e| e.in_stage(AuditStage::AutoFix))?;
            fixes.push(fix);
        }
        fixed_report = Some(
            diff(&trees_of(&locale_files), &config.base_language, Some(&scan.usages))
                .map_err(|e| e.in_stage(AuditStage::Diff))?,
        );
    }

    let verdict = Verdict::judge(
        config,
        fixed_report.as_ref().unwrap_or(&report),
        &hardcoded,
    );
    info!(passed = verdict.passed, "audit complete");

    Ok(AuditOutcome {
        scan,
        hardcoded,
        report,
        fixed_report,
        fixes,
        written_reports,
        verdict,
    })
}

/// Apply previously persisted `missing_keys_<lang>.json` reports without
/// re-running extraction or diff.
///
/// Languages without a report are skipped.
#[must_use = "this function returns a Result that should be handled"]
pub fn run_fix(config: &AuditConfig) -> Result<Vec<LanguageFix>> {
    config.validate()?;
    let _span = info_span!("auto_fix").entered();

    let report_root = config.report_root();
    let store = LocaleStore::new(config.locales_root());
    let mut fixes = Vec::new();

    for language in &config.languages {
        let entries = match read_missing_report(&report_root, language)
            .map_err(|e| e.in_stage(AuditStage::AutoFix))?
        {
            Some(entries) if entries.is_empty() => {
                debug!(language = %language, "missing-key report is empty, skipping");
                continue;
            }
            Some(entries) => entries,
            None => {
                info!(language = %language, "no missing-key report, skipping");
                continue;
            }
        };
        let mut file = store
            .load(language)
            .map_err(|e| e.in_stage(AuditStage::LoadTrees))?;
        fixes.push(fix_file(&mut file, &entries).map_err(|e| e.in_stage(AuditStage::AutoFix))?);
    }

    Ok(fixes)
}

/// Extract key usages from the configured source directory
#[must_use = "this function returns a Result that should be handled"]
pub fn run_keys(config: &AuditConfig) -> Result<CorpusScan> {
    let _span = info_span!("extract_keys").entered();
    scan_corpus(
        &config.source_root(),
        &config.include_extensions,
        &config.exclusions,
    )
    .map_err(|e| e.in_stage(AuditStage::ExtractKeys))
}
