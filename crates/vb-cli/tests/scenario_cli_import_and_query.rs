//! Scenario: `vb` end to end against a temp cellar file
//!
//! # Invariants under test
//!
//! 1. `import` resolves `auto` from the payload shape and persists the batch.
//! 2. Rejected items are listed but do not fail the command.
//! 3. `list`, `dashboard`, `open`, `history`, `delete` read and write the same file.
//! 4. Bad input (unknown mode, over-opening, unknown id) exits non-zero.
//! 5. Hand-entered lines can be added, edited and recounted; a recount
//!    below zero is refused and leaves the file as it was.
//! 6. List filters accept the same spellings imports do.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;

const PINNED_YEAR: &str = "status:\n  now_year: 2026\n";

fn vb(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("vb").unwrap();
    cmd.current_dir(dir)
        .env("VB_CELLAR_PATH", dir.join("cellar.json"))
        .env_remove("VB_OWNER_ID")
        .env("RUST_LOG", "warn")
        .arg("--config")
        .arg(dir.join("vb.yaml"));
    cmd
}

fn setup() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("vb.yaml"), PINNED_YEAR).unwrap();
    std::fs::write(
        dir.path().join("export.json"),
        serde_json::json!({
            "schema_version": 1,
            "bottles": [
                {
                    "external_key": "meursault-2019",
                    "producer": "Roulot",
                    "wine": "Meursault",
                    "vintage": 2019,
                    "color": "Blanc",
                    "quantity": 3,
                    "window_start_year": 2022,
                    "window_end_year": 2032,
                    "peak_start_year": 2025,
                    "peak_end_year": 2029
                },
                {
                    "external_key": "chinon-2020",
                    "producer": "Baudry",
                    "color": "Rouge",
                    "quantity": "2",
                    "window_start_year": "2030",
                    "window_end_year": "2040"
                },
                { "producer": "no key at all" }
            ]
        })
        .to_string(),
    )
    .unwrap();
    dir
}

fn first_id(stdout: &[u8], key: &str) -> String {
    let out = String::from_utf8_lossy(stdout);
    out.lines()
        .find(|l| l.contains(&format!("external_key={key} ")))
        .and_then(|l| l.split_whitespace().find_map(|kv| kv.strip_prefix("id=")))
        .unwrap()
        .to_string()
}

#[test]
fn envelope_import_auto_resolves_to_sync() {
    let dir = setup();

    vb(dir.path())
        .args(["import", "--file", "export.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode=sync created=2 updated=0 rejected=1"))
        .stdout(predicate::str::contains("error external_key=unknown"));

    // Same file again, sync: quantities are replaced, not added.
    vb(dir.path())
        .args(["import", "--file", "export.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mode=sync created=0 updated=2 rejected=1"));

    vb(dir.path())
        .args(["list", "--q", "meursault"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quantity=3 status=peak"))
        .stdout(predicate::str::contains("count=1"));
}

#[test]
fn explicit_merge_adds_quantities() {
    let dir = setup();
    for _ in 0..2 {
        vb(dir.path())
            .args(["import", "--file", "export.json", "--mode", "merge"])
            .assert()
            .success()
            .stdout(predicate::str::contains("mode=merge"));
    }

    vb(dir.path())
        .args(["list", "--color", "red"])
        .assert()
        .success()
        .stdout(predicate::str::contains("external_key=chinon-2020 quantity=4 status=wait"));
}

#[test]
fn dashboard_open_history_delete() {
    let dir = setup();
    vb(dir.path())
        .args(["import", "--file", "export.json"])
        .assert()
        .success();

    vb(dir.path())
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("open_now=1"))
        .stdout(predicate::str::contains("peak=1"))
        .stdout(predicate::str::contains("wait=1"));

    let listed = vb(dir.path()).args(["list", "--status", "open_now"]).output().unwrap();
    assert!(listed.status.success());
    let id = first_id(&listed.stdout, "meursault-2019");

    vb(dir.path())
        .args(["open", "--id", &id, "--qty", "2", "--rating", "93"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quantity_opened=2 remaining=1"));

    vb(dir.path())
        .args(["open", "--id", &id, "--qty", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only 1 on hand"));

    vb(dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("external_key=meursault-2019 quantity_opened=2 rating=93"))
        .stdout(predicate::str::contains("count=1"));

    vb(dir.path())
        .args(["delete", "--id", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("opened_removed=1"));

    vb(dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("count=0"));

    vb(dir.path())
        .args(["show", "--id", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bottle not found"));
}

#[test]
fn filters_list_canonical_values() {
    let dir = setup();
    vb(dir.path())
        .args(["import", "--file", "export.json"])
        .assert()
        .success();

    vb(dir.path())
        .arg("filters")
        .assert()
        .success()
        .stdout(predicate::str::contains("colors=red,white"));
}

fn created_id(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .split_whitespace()
        .find_map(|kv| kv.strip_prefix("id="))
        .unwrap()
        .to_string()
}

#[test]
fn add_edit_adjust_by_hand() {
    let dir = setup();
    let added = vb(dir.path())
        .args(["add", "--key", "cava-nv", "--qty", "2"])
        .args(["--set", "producer=Raventós", "--set", "type=Pétillant", "--set", "sweetness=Brut"])
        .output()
        .unwrap();
    assert!(added.status.success());
    assert!(String::from_utf8_lossy(&added.stdout).contains("created=true"));
    let id = created_id(&added.stdout);

    vb(dir.path())
        .args(["add", "--key", "cava-nv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    vb(dir.path())
        .args(["adjust", "--id", &id, "--delta", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quantity=3"));

    vb(dir.path())
        .args(["adjust", "--id", &id, "--delta=-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only 3 on hand"));

    vb(dir.path())
        .args(["edit", "--id", &id, "--set", "location=Cave Nord"])
        .assert()
        .success()
        .stdout(predicate::str::contains("quantity=3"));

    vb(dir.path())
        .args(["list", "--type", "sparkling", "--sweetness", "BRUT", "--location", "cave nord"])
        .assert()
        .success()
        .stdout(predicate::str::contains("external_key=cava-nv quantity=3"))
        .stdout(predicate::str::contains("count=1"));
}

#[test]
fn list_filters_accept_import_spellings() {
    let dir = setup();
    vb(dir.path())
        .args(["import", "--file", "export.json"])
        .assert()
        .success();

    vb(dir.path())
        .args(["list", "--color", "Rouge"])
        .assert()
        .success()
        .stdout(predicate::str::contains("external_key=chinon-2020"))
        .stdout(predicate::str::contains("count=1"));
}

#[test]
fn unknown_mode_is_refused() {
    let dir = setup();
    vb(dir.path())
        .args(["import", "--file", "export.json", "--mode", "replace"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --mode 'replace'"));
    assert!(!dir.path().join("cellar.json").exists());
}

#[test]
fn config_hash_prints_hash_and_canonical_json() {
    let dir = setup();
    vb(dir.path())
        .args(["config-hash", "vb.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_hash="))
        .stdout(predicate::str::contains("{\"status\":{\"now_year\":2026}}"));
}
