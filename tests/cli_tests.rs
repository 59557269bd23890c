//! Command-line tests for the combo-finder binary

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const ORACLE_DECK: &str = "\
// Commander
1 Thassa's Oracle
1 Demonic Consultation
1x Basalt Monolith
10 Island
";

fn combo_finder() -> Command {
    Command::cargo_bin("combo-finder").expect("binary should build")
}

fn decklist_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".txt").expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_find_text_output() {
    let deck = decklist_file(ORACLE_DECK);

    combo_finder()
        .arg("find")
        .arg(deck.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Combos in deck (1)"))
        .stdout(predicate::str::contains("Thassa's Oracle + Demonic Consultation"))
        .stdout(predicate::str::contains("Potential combos"));
}

#[test]
fn test_find_reads_stdin() {
    combo_finder()
        .args(["find", "-"])
        .write_stdin(ORACLE_DECK)
        .assert()
        .success()
        .stdout(predicate::str::contains("#3"));
}

#[test]
fn test_find_json_output() {
    let deck = decklist_file(ORACLE_DECK);
    let report = json_output(
        combo_finder()
            .args(["--format", "json", "find"])
            .arg(deck.path())
            .args(["--deck-colors", "ub"]),
    );

    let exact: Vec<u64> = report["exact"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_u64().unwrap())
        .collect();
    assert_eq!(exact, [3]);
    assert_eq!(report["deck"]["total_cards"], 13);
    assert_eq!(report["deck_identity"], "ub");

    // Basalt Monolith + Rings of Brighthearth is colorless, so it fits any deck
    let within = report["potential_within"].as_array().unwrap();
    assert!(within.iter().any(|p| p["combo"]["id"] == 4));
}

#[test]
fn test_find_tsv_output() {
    let deck = decklist_file(ORACLE_DECK);

    combo_finder()
        .args(["--format", "tsv", "find"])
        .arg(deck.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "section\tid\tcolor_identity\tcards\tmissing\tprice\tpermalink",
        ))
        .stdout(predicate::str::contains("exact\t3\tub\t"));
}

#[test]
fn test_find_single_card_deck() {
    let deck = decklist_file("1 Sol Ring\n");

    combo_finder()
        .arg("find")
        .arg(deck.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No combos found."));
}

#[test]
fn test_find_rejects_bad_arguments() {
    let deck = decklist_file(ORACLE_DECK);

    combo_finder()
        .arg("find")
        .arg(deck.path())
        .args(["--sort", "popularity"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("popularity"));

    combo_finder()
        .arg("find")
        .arg(deck.path())
        .args(["--colors", "xyz"])
        .assert()
        .failure();

    combo_finder()
        .args(["find", "-"])
        .write_stdin("0 Sol Ring\n")
        .assert()
        .failure();
}

#[test]
fn test_find_missing_catalog_file() {
    let deck = decklist_file(ORACLE_DECK);

    combo_finder()
        .arg("find")
        .arg(deck.path())
        .args(["--catalog", "/nonexistent/combos.json"])
        .assert()
        .failure();
}

#[test]
fn test_catalog_show() {
    combo_finder()
        .args(["catalog", "show", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Combo 3"))
        .stdout(predicate::str::contains("Demonic Consultation"))
        .stdout(predicate::str::contains("https://commanderspellbook.com/combo/3"));

    combo_finder()
        .args(["catalog", "show", "9999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Combo not found: 9999"));
}

#[test]
fn test_catalog_list_by_card() {
    let output = combo_finder()
        .args(["--format", "tsv", "catalog", "list", "--card", "basalt monolith"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let ids: Vec<&str> = stdout
        .lines()
        .skip(1)
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert_eq!(ids, ["4", "16"]);
}

#[test]
fn test_catalog_stats() {
    combo_finder()
        .args(["--format", "tsv", "catalog", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("combos\t18\n"))
        .stdout(predicate::str::contains("skipped\t0\n"));
}

#[test]
fn test_export_round_trips_through_find() {
    let dir = TempDir::new().unwrap();
    let exported = dir.path().join("combos.json.gz");

    combo_finder()
        .args(["catalog", "export"])
        .arg(&exported)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 18 combos"));

    let deck = decklist_file(ORACLE_DECK);
    combo_finder()
        .arg("find")
        .arg(deck.path())
        .arg("--catalog")
        .arg(&exported)
        .assert()
        .success()
        .stdout(predicate::str::contains("Combos in deck (1)"));
}

#[test]
fn test_lenient_catalog_skips_bad_entries() {
    let mut catalog = NamedTempFile::with_suffix(".json").unwrap();
    catalog
        .write_all(
            br#"[
                {"d": 1, "c": ["Thassa's Oracle", "Demonic Consultation"], "i": "ub"},
                {"d": 2, "c": ["Sol Ring"], "i": "purple"}
            ]"#,
        )
        .unwrap();

    combo_finder()
        .args(["catalog", "stats", "--catalog"])
        .arg(catalog.path())
        .assert()
        .failure();

    combo_finder()
        .args(["--format", "tsv", "catalog", "stats", "--lenient", "--catalog"])
        .arg(catalog.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("combos\t1\n"))
        .stdout(predicate::str::contains("skipped\t1\n"));
}
