//! End-to-end CLI tests (§8.1), mirroring the reference CLI's command tests.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn faxt() -> Command {
    Command::cargo_bin("faxt").unwrap()
}

#[test]
fn test_init_scaffolds_config_and_entry_module() {
    let dir = TempDir::new().unwrap();

    faxt()
        .args(["init", "--path"])
        .arg(dir.path())
        .assert()
        .success();

    assert!(dir.path().join("faxt.toml").exists());
    assert!(dir.path().join("main.ama").exists());
}

#[test]
fn test_init_on_nonempty_dir_fails_without_force() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("existing.txt"), "x").unwrap();

    faxt()
        .args(["init", "--path"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not empty"));
}

#[test]
fn test_build_writes_bytecode_next_to_source() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("prog.ama");
    std::fs::write(&source, "mostra 1").unwrap();

    faxt()
        .arg("build")
        .arg(&source)
        .args(["--std-lib"])
        .arg(dir.path().join("no-such-std"))
        .assert()
        .success();

    let bytecode = std::fs::read_to_string(dir.path().join("prog.fasm")).unwrap();
    assert!(bytecode.starts_with(".data\n"));
}

#[test]
fn test_build_reports_compile_error_with_exit_code_one() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("prog.ama");
    std::fs::write(&source, "var x: int = x").unwrap();

    faxt()
        .arg("build")
        .arg(&source)
        .args(["--std-lib"])
        .arg(dir.path().join("no-such-std"))
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_build_missing_input_reports_exit_code_three() {
    let dir = TempDir::new().unwrap();

    faxt()
        .arg("build")
        .arg(dir.path().join("missing.ama"))
        .assert()
        .failure()
        .code(3);
}

#[test]
fn test_check_passes_for_well_formed_source() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("prog.ama");
    std::fs::write(&source, "var x: int = 1").unwrap();

    faxt()
        .arg("check")
        .arg(&source)
        .args(["--std-lib"])
        .arg(dir.path().join("no-such-std"))
        .assert()
        .success();
}

#[test]
fn test_check_fails_for_cyclic_import() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.ama"), "usa \"b.ama\"").unwrap();
    std::fs::write(dir.path().join("b.ama"), "usa \"a.ama\"").unwrap();

    faxt()
        .arg("check")
        .arg(dir.path().join("a.ama"))
        .args(["--std-lib"])
        .arg(dir.path().join("no-such-std"))
        .assert()
        .failure()
        .code(1);
}
