use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn chado_cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chado-cli").unwrap();
    cmd.arg("--db").arg(dir.path().join("chado.db"));
    cmd
}

#[test]
fn test_init_resolve_report() {
    let dir = tempfile::tempdir().unwrap();
    chado_cli(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("vocabulary rows added"));

    chado_cli(&dir)
        .args(["resolve", "+", "--commit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FBgo0000001 (new)"));

    chado_cli(&dir)
        .args(["resolve", "+", "--commit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FBgo0000001 (existing)"));

    chado_cli(&dir)
        .args(["report", "FBgo0000001", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"uniquename\": \"+\""));
}

#[test]
fn test_unknown_symbol_fails() {
    let dir = tempfile::tempdir().unwrap();
    chado_cli(&dir).arg("init").assert().success();
    chado_cli(&dir)
        .args(["resolve", "nonesuch[1]"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("NOT in chado"));
}

#[test]
fn test_dry_run_registers_nothing() {
    let dir = tempfile::tempdir().unwrap();
    chado_cli(&dir).arg("init").assert().success();
    chado_cli(&dir)
        .args(["resolve", "+"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));
    chado_cli(&dir)
        .args(["report", "+"])
        .assert()
        .failure();
}
