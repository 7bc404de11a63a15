use crate::error::AuditError;
use crate::locale::{LocaleTree, KEY_DELIMITER};
use tracing::{debug, warn};

use super::diff::MissingKeyEntry;

/// Prefix marking an inserted value as needing human review
pub fn review_marker(language: &str) -> String {
    format!("[AUTO:{}] ", language)
}

/// Whether `value` was inserted by auto-fix and never reviewed
pub fn is_placeholder(value: &str) -> bool {
    value.starts_with("[AUTO:") || value.starts_with("[AUTO]") || value.starts_with("[AUTO_GEN]")
}

/// `load_failed` → `Load failed`, `dueDate` → `Due date`
pub fn humanize_segment(segment: &str) -> String {
    let mut spaced = String::with_capacity(segment.len() + 4);
    let mut prev_lower = false;
    for c in segment.chars() {
        if c == '_' {
            spaced.push(' ');
            prev_lower = false;
            continue;
        }
        if prev_lower && c.is_uppercase() {
            spaced.push(' ');
        }
        prev_lower = c.is_lowercase();
        spaced.push(c);
    }

    let lower = spaced.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Review-marked placeholder derived from the last segment of `path`
pub fn placeholder_for(path: &str, language: &str) -> String {
    let last = path.rsplit(KEY_DELIMITER).next().unwrap_or(path);
    format!("{}{}", review_marker(language), humanize_segment(last))
}

/// Result of filling one language's gaps
#[derive(Debug)]
pub struct PlaceholderOutcome {
    /// Fresh tree with placeholders inserted; the input tree is untouched
    pub tree: LocaleTree,
    /// Paths that received a placeholder, in entry order
    pub inserted: Vec<String>,
    /// Entries skipped because the key already resolves
    pub skipped_existing: usize,
    /// Per-key failures (structural conflicts, invalid paths); never fatal
    pub conflicts: Vec<AuditError>,
}

impl PlaceholderOutcome {
    pub fn inserted_count(&self) -> usize {
        self.inserted.len()
    }

    pub fn changed(&self) -> bool {
        !self.inserted.is_empty()
    }
}

/// Build a copy of `tree` with a placeholder at every missing entry's path.
///
/// Keys that already resolve to a non-null value are left alone, so applying
/// the same entries twice yields the same tree.
pub fn apply_placeholders(
    tree: &LocaleTree,
    entries: &[MissingKeyEntry],
    language: &str,
) -> PlaceholderOutcome {
    let mut updated = tree.clone();
    let mut inserted = Vec::new();
    let mut skipped_existing = 0;
    let mut conflicts = Vec::new();

    for entry in entries {
        if updated.get(&entry.path).map_or(false, |n| !n.is_null()) {
            skipped_existing += 1;
            continue;
        }
        match updated.set(&entry.path, placeholder_for(&entry.path, language)) {
            Ok(()) => inserted.push(entry.path.clone()),
            Err(e) => {
                warn!(language, key = %entry.path, error = %e, "placeholder not inserted");
                conflicts.push(e);
            }
        }
    }

    debug!(
        language,
        inserted = inserted.len(),
        skipped = skipped_existing,
        conflicts = conflicts.len(),
        "placeholders applied"
    );

    PlaceholderOutcome {
        tree: updated,
        inserted,
        skipped_existing,
        conflicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn entry(path: &str) -> MissingKeyEntry {
        MissingKeyEntry {
            path: path.to_string(),
            placeholder: String::new(),
            usage_locations: BTreeSet::new(),
        }
    }

    #[test]
    fn test_humanize_segment() {
        assert_eq!(humanize_segment("load_failed"), "Load failed");
        assert_eq!(humanize_segment("cta"), "Cta");
        assert_eq!(humanize_segment("dueDate"), "Due date");
        assert_eq!(humanize_segment("KPI"), "Kpi");
        assert_eq!(humanize_segment("min_charsCount"), "Min chars count");
    }

    #[test]
    fn test_placeholder_for() {
        assert_eq!(
            placeholder_for("crm.errors.load_failed", "en"),
            "[AUTO:en] Load failed"
        );
        assert_eq!(placeholder_for("home_banner.cta", "he"), "[AUTO:he] Cta");
        assert!(is_placeholder(&placeholder_for("a.b", "fr")));
        assert!(!is_placeholder("Accueil"));
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let mut tree = LocaleTree::new();
        tree.set("home_banner.title", "Titre").unwrap();
        let before = tree.clone();

        let outcome = apply_placeholders(&tree, &[entry("home_banner.cta")], "fr");
        assert_eq!(tree, before);
        assert_eq!(outcome.tree.get_text("home_banner.cta"), Some("[AUTO:fr] Cta"));
        assert_eq!(outcome.tree.get_text("home_banner.title"), Some("Titre"));
        assert_eq!(outcome.inserted, vec!["home_banner.cta"]);
    }

    #[test]
    fn test_conflict_is_collected_not_fatal() {
        let mut tree = LocaleTree::new();
        tree.set("a.b", "leaf").unwrap();

        let outcome = apply_placeholders(&tree, &[entry("a.b.c"), entry("x.y")], "en");
        assert_eq!(outcome.conflicts.len(), 1);
        assert!(matches!(
            outcome.conflicts[0],
            AuditError::StructuralConflict { .. }
        ));
        assert_eq!(outcome.inserted, vec!["x.y"]);
        assert_eq!(outcome.tree.get_text("a.b"), Some("leaf"));
    }

    #[test]
    fn test_existing_keys_skipped() {
        let mut tree = LocaleTree::new();
        tree.set("nav.home", "Home").unwrap();
        let outcome = apply_placeholders(&tree, &[entry("nav.home")], "en");
        assert_eq!(outcome.skipped_existing, 1);
        assert!(!outcome.changed());
        assert_eq!(outcome.tree.get_text("nav.home"), Some("Home"));
    }
}
