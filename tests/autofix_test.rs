use i18n_audit::audit::is_placeholder;
use i18n_audit::locale::write_atomic;
use i18n_audit::{
    apply_placeholders, diff, read_missing_report, write_missing_report, AuditError, LocaleFile,
    LocaleFormat, LocaleTree,
};
use indexmap::IndexMap;
use std::fs;
use tempfile::TempDir;

fn json(text: &str) -> LocaleTree {
    LocaleFormat::Json.load(text).unwrap()
}

fn pair(base: LocaleTree, target: LocaleTree) -> IndexMap<String, LocaleTree> {
    let mut trees = IndexMap::new();
    trees.insert("fr".to_string(), base);
    trees.insert("en".to_string(), target);
    trees
}

#[test]
fn test_placeholder_inserted_beside_sibling() {
    let base = json(r#"{"home_banner": {"title": "Bienvenue", "cta": "Commencer"}}"#);
    let target = json(r#"{"home_banner": {"title": "Welcome"}}"#);
    let report = diff(&pair(base, target.clone()), "fr", None).unwrap();

    let outcome = apply_placeholders(&target, &report.language("en").unwrap().missing, "en");
    assert_eq!(outcome.tree.get_text("home_banner.cta"), Some("[AUTO:en] Cta"));
    assert_eq!(outcome.tree.get_text("home_banner.title"), Some("Welcome"));
    assert!(is_placeholder(outcome.tree.get_text("home_banner.cta").unwrap()));
}

#[test]
fn test_autofix_is_idempotent() {
    let base = json(r#"{"a": {"b": "x", "c": "y"}, "d": {"e": {"f": "z"}}}"#);
    let target = json(r#"{"a": {"b": "x2"}}"#);
    let report = diff(&pair(base, target.clone()), "fr", None).unwrap();
    let missing = &report.language("en").unwrap().missing;

    let once = apply_placeholders(&target, missing, "en");
    let twice = apply_placeholders(&once.tree, missing, "en");

    assert_eq!(once.tree, twice.tree);
    assert_eq!(once.inserted.len(), 2);
    assert!(twice.inserted.is_empty());
    assert_eq!(twice.skipped_existing, 2);
}

#[test]
fn test_autofix_closes_every_gap() {
    let base = json(r#"{"a": {"b": "x", "c": "y"}, "d": "w", "e": {"f": {"g": "v"}}}"#);
    let target = json(r#"{"a": {"b": "x2"}}"#);
    let report = diff(&pair(base.clone(), target.clone()), "fr", None).unwrap();
    let outcome = apply_placeholders(&target, &report.language("en").unwrap().missing, "en");

    let after = diff(&pair(base, outcome.tree), "fr", None).unwrap();
    let en = after.language("en").unwrap();
    assert!(en.missing.is_empty());
    assert_eq!(en.coverage, Some(100.0));
}

#[test]
fn test_conflicting_key_reported_and_skipped() {
    // Base and target disagree on whether `menu` is a section
    let base = json(r#"{"menu": {"title": "Menu"}, "footer": {"copy": "Tous droits"}}"#);
    let target = json(r#"{"menu": "Main menu"}"#);
    let report = diff(&pair(base, target.clone()), "fr", None).unwrap();

    let outcome = apply_placeholders(&target, &report.language("en").unwrap().missing, "en");
    assert_eq!(outcome.conflicts.len(), 1);
    match &outcome.conflicts[0] {
        AuditError::StructuralConflict {
            path,
            blocking_segment,
        } => {
            assert_eq!(path, "menu.title");
            assert_eq!(blocking_segment, "menu");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(outcome.inserted, vec!["footer.copy"]);
    assert_eq!(outcome.tree.get_text("menu"), Some("Main menu"));
}

#[test]
fn test_fix_through_persisted_report() {
    let dir = TempDir::new().unwrap();
    let locale_path = dir.path().join("en.json");
    fs::write(&locale_path, "{\n  \"nav\": {\n    \"home\": \"Home\"\n  }\n}\n").unwrap();

    let base = json(r#"{"nav": {"home": "Accueil", "about": "À propos"}}"#);
    let file = LocaleFile::load("en", &locale_path).unwrap();
    let report = diff(&pair(base, file.tree.clone()), "fr", None).unwrap();
    let reports = dir.path().join("reports");
    write_missing_report(&reports, "en", &report.language("en").unwrap().missing).unwrap();

    let entries = read_missing_report(&reports, "en").unwrap().unwrap();
    let outcome = apply_placeholders(&file.tree, &entries, "en");
    file.save_tree(&outcome.tree).unwrap();

    assert_eq!(
        fs::read_to_string(&locale_path).unwrap(),
        "{\n  \"nav\": {\n    \"home\": \"Home\",\n    \"about\": \"[AUTO:en] About\"\n  }\n}\n"
    );
}

#[test]
fn test_yaml_catalog_keeps_its_format() {
    let dir = TempDir::new().unwrap();
    let locale_path = dir.path().join("he.yml");
    fs::write(&locale_path, "nav:\n  home: בית\n").unwrap();

    let file = LocaleFile::load("he", &locale_path).unwrap();
    let base = json(r#"{"nav": {"home": "Accueil", "contact": "Contact"}}"#);
    let report = diff(&pair(base, file.tree.clone()), "fr", None).unwrap();
    let outcome = apply_placeholders(&file.tree, &report.language("en").unwrap().missing, "he");
    file.save_tree(&outcome.tree).unwrap();

    let reloaded = LocaleFile::load("he", &locale_path).unwrap();
    assert_eq!(reloaded.format, LocaleFormat::Yaml);
    assert_eq!(reloaded.tree.get_text("nav.home"), Some("בית"));
    assert_eq!(reloaded.tree.get_text("nav.contact"), Some("[AUTO:he] Contact"));
}

#[test]
fn test_failed_write_leaves_target_intact() {
    let dir = TempDir::new().unwrap();
    // A directory where the file should go makes the final rename fail
    let target = dir.path().join("fr.json");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("keep.txt"), "keep").unwrap();

    let err = write_atomic(&target, b"{}\n").unwrap_err();
    assert!(matches!(err, AuditError::FileWrite { .. }));
    assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "keep");

    // No stray temp files left beside it
    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}
