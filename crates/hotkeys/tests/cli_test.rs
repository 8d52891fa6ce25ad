//! Integration tests for the `hotkeys` CLI binary.
//!
//! Everything runs against the offline `--seed` store, so no network or
//! user configuration is touched.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/catalog.json")
}

/// Build a [`Command`] for the `hotkeys` binary with env isolation.
fn hotkeys_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("hotkeys");
    cmd.env("HOME", "/tmp/hotkeys-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/hotkeys-cli-test-nonexistent")
        .env_remove("HOTKEYS_PROFILE")
        .env_remove("HOTKEYS_URL")
        .env_remove("HOTKEYS_API_KEY")
        .env_remove("HOTKEYS_USER")
        .env_remove("HOTKEYS_SEED")
        .env_remove("HOTKEYS_OUTPUT")
        .env_remove("HOTKEYS_INSECURE")
        .env_remove("HOTKEYS_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Command bound to the read-only fixture.
fn offline_cmd() -> assert_cmd::Command {
    let mut cmd = hotkeys_cmd();
    cmd.arg("--seed").arg(fixture());
    cmd
}

/// Copy the fixture somewhere writable for mutating commands.
fn writable_catalog() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::copy(fixture(), &path).unwrap();
    (dir, path)
}

fn read_catalog(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn ids(value: &serde_json::Value, table: &str) -> Vec<String> {
    value[table]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_str().unwrap_or_default().to_owned())
        .collect()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = hotkeys_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    hotkeys_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("programs")
            .and(predicate::str::contains("shortcuts"))
            .and(predicate::str::contains("favorites"))
            .and(predicate::str::contains("admin")),
    );
}

#[test]
fn test_completions_zsh() {
    hotkeys_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_config_show_without_file() {
    hotkeys_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_missing_store_is_reported() {
    hotkeys_cmd()
        .args(["programs", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No catalog store configured"));
}

#[test]
fn test_unknown_profile_is_reported() {
    hotkeys_cmd()
        .args(["--profile", "nope", "programs", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'nope' not found"));
}

// ── Browsing ────────────────────────────────────────────────────────

#[test]
fn test_programs_list_plain() {
    offline_cmd()
        .args(["-o", "plain", "programs", "list"])
        .assert()
        .success()
        .stdout("p1\np2\np3\n");
}

#[test]
fn test_programs_search_is_case_insensitive() {
    offline_cmd()
        .args(["-o", "plain", "programs", "list", "--search", "EDIT"])
        .assert()
        .success()
        .stdout("p1\np2\n");
}

#[test]
fn test_programs_by_category_slug() {
    offline_cmd()
        .args(["-o", "plain", "programs", "list", "--category", "office"])
        .assert()
        .success()
        .stdout("p3\n");
}

#[test]
fn test_programs_popular() {
    offline_cmd()
        .args(["-o", "plain", "programs", "list", "--popular"])
        .assert()
        .success()
        .stdout("p1\np3\n");
}

#[test]
fn test_no_matches_prints_nothing() {
    offline_cmd()
        .args(["-o", "plain", "programs", "list", "--search", "zzz"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_categories_table() {
    offline_cmd()
        .args(["--color", "never", "categories", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("editors").and(predicate::str::contains("Office")));
}

#[test]
fn test_program_show_json_includes_shortcuts() {
    let output = offline_cmd()
        .args(["-o", "json", "programs", "show", "p1", "--search", "palette"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["program"]["name"], "Code");
    assert_eq!(body["category"]["slug"], "editors");
    assert_eq!(body["shortcuts"].as_array().unwrap().len(), 1);
    assert_eq!(body["shortcuts"][0]["keys"], "Ctrl+Shift+P");
}

#[test]
fn test_shortcuts_search_matches_keys() {
    offline_cmd()
        .args([
            "-o", "plain", "shortcuts", "list", "--program", "p1", "--search", "ctrl+s",
        ])
        .assert()
        .success()
        .stdout("s2\ns1\n");
}

#[test]
fn test_unknown_program_exits_not_found() {
    offline_cmd()
        .args(["programs", "show", "p9"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("program 'p9' not found"));
}

// ── Favorites ───────────────────────────────────────────────────────

#[test]
fn test_favorites_require_user() {
    offline_cmd().args(["favorites", "list"]).assert().code(3);
    offline_cmd()
        .args(["programs", "list", "--favorites"])
        .assert()
        .code(3);
}

#[test]
fn test_favorites_list_for_user() {
    offline_cmd()
        .args(["-u", "u1", "-o", "plain", "favorites", "list"])
        .assert()
        .success()
        .stdout("p1\n");
}

#[test]
fn test_toggle_favorite_persists_to_seed() {
    let (_dir, path) = writable_catalog();

    hotkeys_cmd()
        .arg("--seed")
        .arg(&path)
        .args(["-u", "u1", "favorites", "toggle", "p2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Added Vim to favorites"));

    let favorites = read_catalog(&path)["favorites"].clone();
    let programs: Vec<_> = favorites
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["program_id"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(programs, vec!["p1", "p2"]);
}

// ── Admin ───────────────────────────────────────────────────────────

#[test]
fn test_admin_requires_admin_profile() {
    let (_dir, path) = writable_catalog();
    let before = std::fs::read_to_string(&path).unwrap();

    hotkeys_cmd()
        .arg("--seed")
        .arg(&path)
        .args(["-u", "u1", "-y", "admin", "delete", "program", "p1"])
        .assert()
        .code(5);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_duplicate_slug_exits_with_usage_error() {
    let (_dir, path) = writable_catalog();

    hotkeys_cmd()
        .arg("--seed")
        .arg(&path)
        .args([
            "-u", "admin", "admin", "categories", "save", "--name", "Office 2", "--slug",
            "office",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("slug"));

    assert_eq!(ids(&read_catalog(&path), "categories"), vec!["c1", "c2"]);
}

#[test]
fn test_save_program_into_category_by_slug() {
    let (_dir, path) = writable_catalog();

    hotkeys_cmd()
        .arg("--seed")
        .arg(&path)
        .args([
            "-u", "admin", "admin", "programs", "save", "--category", "office", "--name",
            "Excel", "--popular", "true",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved program"));

    let catalog = read_catalog(&path);
    let excel = catalog["programs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "Excel")
        .cloned()
        .unwrap();
    assert_eq!(excel["category_id"], "c2");
    assert_eq!(excel["is_popular"], true);
}

#[test]
fn test_delete_category_cascades() {
    let (_dir, path) = writable_catalog();

    hotkeys_cmd()
        .arg("--seed")
        .arg(&path)
        .args(["-u", "admin", "-y", "admin", "delete", "category", "c1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Deleted category c1, 2 program(s), 3 shortcut(s), 1 favorite(s)",
        ));

    let catalog = read_catalog(&path);
    assert_eq!(ids(&catalog, "categories"), vec!["c2"]);
    assert_eq!(ids(&catalog, "programs"), vec!["p3"]);
    assert_eq!(ids(&catalog, "shortcuts"), vec!["s4"]);
    assert!(catalog["favorites"].as_array().unwrap().is_empty());
}
