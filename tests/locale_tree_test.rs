use i18n_audit::{AuditError, LocaleFormat, LocaleNode, LocaleTree};
use proptest::prelude::*;

fn build(entries: &[(String, String)]) -> LocaleTree {
    let mut tree = LocaleTree::new();
    for (path, value) in entries {
        // Conflicting paths are skipped; whatever was set is still a reachable tree
        let _ = tree.set(path, value.as_str());
    }
    tree
}

fn key_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z_]{0,6}", 1..4).prop_map(|segments| segments.join("."))
}

proptest! {
    #[test]
    fn json_round_trip(entries in prop::collection::vec((key_path(), ".{0,20}"), 0..20)) {
        let tree = build(&entries);
        let text = LocaleFormat::Json.serialize(&tree).unwrap();
        prop_assert_eq!(LocaleFormat::Json.load(&text).unwrap(), tree);
    }

    #[test]
    fn yaml_round_trip(entries in prop::collection::vec((key_path(), "[A-Za-z][A-Za-z0-9 ]{0,12}[a-z]"), 0..20)) {
        let tree = build(&entries);
        let text = LocaleFormat::Yaml.serialize(&tree).unwrap();
        prop_assert_eq!(LocaleFormat::Yaml.load(&text).unwrap(), tree);
    }

    #[test]
    fn yaml_output_always_reads_back(entries in prop::collection::vec((key_path(), ".{0,20}"), 0..20)) {
        let tree = build(&entries);
        // Values the emitter cannot represent faithfully are refused, never written
        if let Ok(text) = LocaleFormat::Yaml.serialize(&tree) {
            prop_assert_eq!(LocaleFormat::Yaml.load(&text).unwrap(), tree);
        }
    }

    #[test]
    fn set_then_get(entries in prop::collection::vec((key_path(), "[a-z]{1,8}"), 1..10)) {
        let mut tree = LocaleTree::new();
        for (path, value) in &entries {
            if tree.set(path, value.as_str()).is_ok() {
                prop_assert_eq!(tree.get_text(path), Some(value.as_str()));
            }
        }
    }
}

#[test]
fn test_serialize_is_deterministic() {
    let mut tree = LocaleTree::new();
    tree.set("zeta.b", "2").unwrap();
    tree.set("alpha", "1").unwrap();
    tree.set("zeta.a", "3").unwrap();

    let first = LocaleFormat::Json.serialize(&tree).unwrap();
    let second = LocaleFormat::Json.serialize(&tree).unwrap();
    assert_eq!(first, second);
    // Declaration order, not alphabetical
    assert!(first.find("zeta").unwrap() < first.find("alpha").unwrap());
    assert!(first.find("\"b\"").unwrap() < first.find("\"a\"").unwrap());
}

#[test]
fn test_literals_survive_round_trip() {
    let text = r#"{"count": 3, "enabled": true, "missing": null, "list": ["a", "b"]}"#;
    let tree = LocaleFormat::Json.load(text).unwrap();
    assert!(tree.get("missing").unwrap().is_null());
    assert_eq!(tree.leaf_count(), 4);

    let again = LocaleFormat::Json
        .load(&LocaleFormat::Json.serialize(&tree).unwrap())
        .unwrap();
    assert_eq!(again, tree);
}

#[test]
fn test_empty_sections_reported_as_empty_values() {
    let tree = LocaleFormat::Json
        .load(r#"{"a": {}, "b": {"c": "", "d": "x"}}"#)
        .unwrap();
    assert_eq!(tree.key_paths(), vec!["b.c", "b.d"]);
    assert_eq!(tree.empty_value_paths(), vec!["a", "b.c"]);
}

#[test]
fn test_conflict_names_blocking_segment() {
    let mut tree = LocaleTree::new();
    tree.set("nav.home", "Home").unwrap();
    match tree.set("nav.home.title", "Title") {
        Err(AuditError::StructuralConflict {
            path,
            blocking_segment,
        }) => {
            assert_eq!(path, "nav.home.title");
            assert_eq!(blocking_segment, "nav.home");
        }
        other => panic!("expected a structural conflict, got {:?}", other),
    }
    // Tree unchanged
    assert_eq!(tree.get_text("nav.home"), Some("Home"));
}

#[test]
fn test_invalid_paths_rejected() {
    let mut tree = LocaleTree::new();
    assert!(matches!(tree.set("", "x"), Err(AuditError::InvalidKeyPath(_))));
    assert!(matches!(tree.set("a..b", "x"), Err(AuditError::InvalidKeyPath(_))));
    assert!(tree.is_empty());
}

#[test]
fn test_set_replaces_section_with_leaf() {
    let mut tree = LocaleTree::new();
    tree.set("a.b", "x").unwrap();
    tree.set("a", LocaleNode::from("flat")).unwrap();
    assert_eq!(tree.get_text("a"), Some("flat"));
    assert_eq!(tree.key_paths(), vec!["a"]);
}

#[test]
fn test_yaml_refuses_text_that_reads_back_as_number() {
    let mut tree = LocaleTree::new();
    tree.set("stats.mode", "0o17").unwrap();
    tree.set("stats.label", "Mode").unwrap();

    let err = LocaleFormat::Yaml.serialize(&tree).unwrap_err();
    assert!(err.contains("stats.mode"));
}
