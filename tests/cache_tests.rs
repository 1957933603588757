//! Cache command integration tests

mod common;

use predicates::prelude::*;

fn seed_snapshot(workspace: &common::TestWorkspace, hash: &str) {
    workspace.write_file(
        &format!("cache/{hash}/acme-widget-1/widget.psd1"),
        "@{ ModuleVersion = '1.0' }",
    );
}

#[test]
fn test_cache_empty() {
    let workspace = common::TestWorkspace::new();
    workspace
        .cmd()
        .arg("cache")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache Statistics"))
        .stdout(predicate::str::contains("Cache is empty."));
}

#[test]
fn test_cache_list_shows_snapshots() {
    let workspace = common::TestWorkspace::new();
    let hash = "a".repeat(64);
    seed_snapshot(&workspace, &hash);
    workspace.write_file(&format!("cache/{hash}.zip"), "zip");

    workspace
        .cmd()
        .args(["cache", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("blake3:{hash}")))
        .stdout(predicate::str::contains("extracted + archive"));
}

#[test]
fn test_cache_clear_only_matching() {
    let workspace = common::TestWorkspace::new();
    let keep = "b".repeat(64);
    let drop = "c".repeat(64);
    seed_snapshot(&workspace, &keep);
    seed_snapshot(&workspace, &drop);

    workspace
        .cmd()
        .args(["cache", "clear", "--only", "blake3:ccc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 cached snapshot matching"));

    assert!(workspace.file_exists(&format!("cache/{keep}")));
    assert!(!workspace.file_exists(&format!("cache/{drop}")));
}

#[test]
fn test_cache_clear_only_unknown_hash() {
    let workspace = common::TestWorkspace::new();
    seed_snapshot(&workspace, &"d".repeat(64));

    workspace
        .cmd()
        .args(["cache", "clear", "--only", "eee"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Snapshot not found in cache"));
}

#[test]
fn test_cache_clear_only_rejects_non_hex() {
    let workspace = common::TestWorkspace::new();
    workspace
        .cmd()
        .args(["cache", "clear", "--only", "zzz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid snapshot hash prefix"));
}

#[test]
fn test_cache_clear_keeps_unrelated_files() {
    let workspace = common::TestWorkspace::new();
    seed_snapshot(&workspace, &"1".repeat(64));
    workspace.write_file("cache/notes.txt", "keep me");

    workspace
        .cmd()
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 snapshot removed"));

    assert!(workspace.file_exists("cache/notes.txt"));
    assert!(!workspace.file_exists(&format!("cache/{}", "1".repeat(64))));
}

#[test]
fn test_cache_dir_from_config_file() {
    let workspace = common::TestWorkspace::new();
    let hash = "f".repeat(64);
    workspace.write_file(&format!("alt/{hash}/r/m.psd1"), "@{}");
    workspace.write_file(
        "modfetch.yaml",
        &format!("temp_dir: {}\n", workspace.path.join("alt").display()),
    );

    workspace
        .cmd()
        .env_remove("MODFETCH_TEMP_DIR")
        .args(["--config", "modfetch.yaml", "cache", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(hash));
}
