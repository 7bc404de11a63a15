use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FIXTURE: &str = "tests/fixtures/crm-app";

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("i18n-audit").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("I18N_AUDIT_LOG");
    cmd
}

/// Minimal project with two complete catalogs and no hardcoded text
fn complete_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let locales = dir.path().join("src/i18n/locales");
    fs::create_dir_all(&locales).unwrap();
    fs::write(
        dir.path().join("src/Nav.jsx"),
        "export const Nav = ({ t }) => <a>{t('nav.home')}</a>;\n",
    )
    .unwrap();
    fs::write(locales.join("fr.json"), r#"{"nav": {"home": "Accueil"}}"#).unwrap();
    fs::write(locales.join("en.json"), r#"{"nav": {"home": "Home"}}"#).unwrap();
    dir
}

fn root_arg(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn test_help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Find missing translations"))
        .stdout(predicate::str::contains("audit"))
        .stdout(predicate::str::contains("keys"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_complete_project_passes() {
    let dir = complete_project();
    cmd()
        .args(["--root", &root_arg(dir.path()), "--languages", "fr,en"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("PASSED"))
        .stdout(predicate::str::contains("en: 100.0%"));
}

#[test]
fn test_fixture_fails_and_names_reasons() {
    cmd()
        .args(["--root", FIXTURE])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("1 missing key(s)"))
        .stdout(predicate::str::contains("2 possible hardcoded text(s)"))
        .stdout(predicate::str::contains("home_banner.cta"))
        .stdout(predicate::str::contains("identical to base (heuristic): 1"));
}

#[test]
fn test_simple_format() {
    cmd()
        .args(["--root", FIXTURE, "audit", "--format", "simple", "--no-hardcoded"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("missing:en:home_banner.cta\n"))
        .stdout(predicate::str::contains("identical:he:home_banner.title\n"))
        .stdout(predicate::str::contains("dynamic:App.jsx:12:status.${lead.status}\n"))
        .stdout(predicate::str::contains("coverage:en:80.0%\n"))
        .stdout(predicate::str::contains("hardcoded:").not())
        .stdout(predicate::str::ends_with("verdict:fail\n"));
}

#[test]
fn test_json_format() {
    let output = cmd()
        .args(["--root", FIXTURE, "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["report"]["base_language"], "fr");
    assert_eq!(value["verdict"]["passed"], false);
    assert_eq!(value["report"]["languages"][1]["missing"][0]["path"], "home_banner.cta");
}

#[test]
fn test_fix_flag_rewrites_catalog() {
    let dir = complete_project();
    let locales = dir.path().join("src/i18n/locales");
    fs::write(locales.join("fr.json"), r#"{"nav": {"home": "Accueil", "about": "À propos"}}"#)
        .unwrap();

    cmd()
        .args(["--root", &root_arg(dir.path()), "audit", "--languages", "fr,en", "--fix"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("1 placeholder(s) inserted"));

    let en = fs::read_to_string(locales.join("en.json")).unwrap();
    assert!(en.contains("\"about\": \"[AUTO:en] About\""));
}

#[test]
fn test_write_missing_then_fix_command() {
    let dir = complete_project();
    let locales = dir.path().join("src/i18n/locales");
    fs::write(locales.join("fr.json"), r#"{"nav": {"home": "Accueil", "contact": "Contact"}}"#)
        .unwrap();
    let root = root_arg(dir.path());

    cmd()
        .args(["--root", &root, "--languages", "fr,en", "--write-missing"])
        .assert()
        .code(1);
    assert!(dir.path().join("i18n-reports/missing_keys_en.json").is_file());

    cmd()
        .args(["--root", &root, "fix", "--languages", "fr,en", "--format", "simple"])
        .assert()
        .success()
        .stdout("fixed:en:nav.contact\n");

    cmd()
        .args(["--root", &root, "--languages", "fr,en"])
        .assert()
        .code(0);
}

#[test]
fn test_keys_command() {
    cmd()
        .args(["--root", FIXTURE, "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nav.home\tApp.jsx,pages/Leads.jsx\n"))
        .stdout(predicate::str::contains("crm.errors.load_failed\tApp.jsx\n"));
}

#[test]
fn test_config_file_is_applied() {
    let dir = complete_project();
    fs::write(
        dir.path().join("i18n-audit.toml"),
        "languages = [\"fr\", \"en\"]\nbase_language = \"en\"\n",
    )
    .unwrap();

    cmd()
        .args(["--root", &root_arg(dir.path()), "--format", "simple"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("coverage:fr:100.0%"));
}

#[test]
fn test_malformed_locale_exits_2() {
    let dir = complete_project();
    fs::write(dir.path().join("src/i18n/locales/en.json"), "{ nope").unwrap();

    cmd()
        .args(["--root", &root_arg(dir.path()), "--languages", "fr,en"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("locale loading aborted"))
        .stderr(predicate::str::contains("en.json"));
}

#[test]
fn test_unknown_config_key_exits_2() {
    let dir = complete_project();
    fs::write(dir.path().join("i18n-audit.toml"), "langs = [\"fr\"]\n").unwrap();

    cmd()
        .args(["--root", &root_arg(dir.path())])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("i18n-audit.toml"));
}

#[test]
fn test_invalid_language_rejected() {
    cmd()
        .args(["--languages", "fr,../x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid language code"));
}

#[test]
fn test_preview_validation() {
    cmd()
        .args(["--preview", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("preview must be between 1 and 1000"));
}
