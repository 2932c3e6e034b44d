//! Command-line tests for the subforge binary

use assert_cmd::Command;
use predicates::prelude::*;

fn subforge() -> Command {
    let mut cmd = Command::cargo_bin("subforge").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_generates_from_list_flag() {
    subforge()
        .args(["-l", "api.example.com", "-p", "{{sub}}-{{word}}.{{root}}", "--payload", "word=dev,prod"])
        .assert()
        .success()
        .stdout("api-dev.example.com\napi-prod.example.com\n");
}

#[test]
fn test_reads_domains_from_stdin() {
    subforge()
        .args(["-p", "{{word}}.{{root}}", "--payload", "word=qa"])
        .write_stdin("one.example.com\ntwo.example.net\n")
        .assert()
        .success()
        .stdout("qa.example.com\nqa.example.net\n");
}

#[test]
fn test_estimate_flag() {
    subforge()
        .args(["-l", "example.com", "-p", "{{word}}.{{root}}", "--payload", "word=a,b,c", "--estimate"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_limit_flag() {
    subforge()
        .args(["-l", "example.com", "-p", "{{word}}.{{root}}", "--payload", "word=a,b,c", "--limit", "1"])
        .assert()
        .success()
        .stdout("a.example.com\n");
}

#[test]
fn test_output_file_and_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("permutations.yaml");
    let output = dir.path().join("out.txt");
    std::fs::write(&config, "patterns:\n  - \"{{word}}.{{root}}\"\npayloads:\n  word:\n    - mail\n").unwrap();

    subforge()
        .arg("-l")
        .arg("example.com")
        .arg("-c")
        .arg(&config)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "mail.example.com\n");
}

#[test]
fn test_no_domains_fails() {
    subforge()
        .args(["-l", ","])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no domains provided"));
}

#[test]
fn test_invalid_payload_flag() {
    subforge()
        .args(["-l", "example.com", "--payload", "nonsense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid payload"));
}
