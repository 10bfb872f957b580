//! Exit-code and output contracts of the `watson` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const CORPUS: &str = "\
[[Paris]]
Home of the Eiffel Tower and the Louvre.
[[London]]
Home of Big Ben and the Tower Bridge.
[[Berlin]]
Home of the Brandenburg Gate.
";

fn watson() -> Command {
    Command::cargo_bin("watson").unwrap()
}

fn setup(root: &Path, answers: &str) {
    fs::create_dir_all(root.join("corpus")).unwrap();
    fs::write(root.join("corpus/enwiki-sample.txt"), CORPUS).unwrap();
    fs::write(root.join("questions.txt"), answers).unwrap();
}

fn base_args(root: &Path) -> Vec<String> {
    vec![
        "--corpus".into(),
        root.join("corpus").to_string_lossy().into_owned(),
        "--index".into(),
        root.join("index").to_string_lossy().into_owned(),
        "--answers".into(),
        root.join("questions.txt").to_string_lossy().into_owned(),
    ]
}

#[test]
fn help_exits_cleanly() {
    watson().arg("--help").assert().success().stdout(predicate::str::contains("--query"));
}

#[test]
fn empty_query_exits_with_one() {
    let tmp = tempfile::tempdir().unwrap();
    watson().args(base_args(tmp.path())).arg("-q").assert().code(1);
}

#[test]
fn missing_index_exits_with_two() {
    let tmp = tempfile::tempdir().unwrap();
    watson()
        .args(base_args(tmp.path()))
        .args(["-q", "eiffel"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("index"));
}

#[test]
fn malformed_answer_key_exits_with_three() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path(), "LANDMARKS\nEiffel Tower\nParis\nnot blank\n");
    watson().args(base_args(tmp.path())).arg("-p").assert().code(3);
}

#[test]
fn evaluation_reports_accuracy() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path(), "LANDMARKS\nEiffel Tower\nParis\n\nLANDMARKS\nBrandenburg Gate\nberlin | Berlin, Germany\n\n");
    watson()
        .args(base_args(tmp.path()))
        .arg("-p")
        .assert()
        .success()
        .stdout(predicate::str::contains("What is... Paris?"))
        .stdout(predicate::str::contains("Watson got 2 out of 2 right."))
        .stdout(predicate::str::contains("Of the wrong questions, 0 were results in the top 10 documents."));
}

#[test]
fn ad_hoc_query_uses_persisted_index() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path(), "LANDMARKS\nEiffel Tower\nParis\n\n");
    watson().args(base_args(tmp.path())).arg("-p").assert().success();

    watson()
        .args(base_args(tmp.path()))
        .args(["-q", "Big", "Ben"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tokenized query: big ben"))
        .stdout(predicate::str::contains("What is... London?"))
        .stdout(predicate::str::contains("right.").not());
}
