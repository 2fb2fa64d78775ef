use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap().parent().unwrap().to_path_buf()
}

fn goo() -> Command {
    let mut cmd = Command::cargo_bin("goo").unwrap();
    cmd.env_remove("GOO_MAX_CALL_DEPTH").env_remove("RUST_LOG");
    cmd
}

fn write_program(src: &str) -> (tempfile::TempDir, PathBuf) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("prog.go");
    std::fs::write(&path, src).unwrap();
    (tmp_dir, path)
}

#[test]
fn runs_factorial_demo() {
    goo()
        .arg(workspace_root().join("demos/factorial.go"))
        .assert()
        .success()
        .stdout("hello world\nfactorial(1) = 1\nfactorial(6) = 720\n");
}

#[test]
fn runs_fill_dump_demo() {
    goo()
        .arg(workspace_root().join("demos/fill_dump.go"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("k, arr[k] = 0 0\nk, arr[k] = 1 1\n"))
        .stdout(predicate::str::contains("k, arr[k] = 9 81\nall done\n"));
}

#[test]
fn runs_not_demo() {
    goo()
        .arg(workspace_root().join("demos/not.go"))
        .assert()
        .success()
        .stdout("(1 == 1): 1\n!(1 == 1): 0\n!!(1 == 1): 1\n");
}

#[test]
fn runs_and_demo_with_short_circuit() {
    goo()
        .arg(workspace_root().join("demos/and.go"))
        .assert()
        .success()
        .stdout(" evalTrue 1\n0\n0\n0\n");
}

#[test]
fn quiet_discards_output() {
    goo()
        .arg("--quiet")
        .arg(workspace_root().join("demos/factorial.go"))
        .assert()
        .success()
        .stdout("");
}

#[test]
fn parse_error_is_nonzero() {
    let (_tmp, path) = write_program("package main\nfunc main() {\n  x = \n}\n");
    goo()
        .arg(path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Parse error"))
        .stderr(predicate::str::contains("line 4"));
}

#[test]
fn lex_error_is_nonzero() {
    let (_tmp, path) = write_program("package main\nfunc main() { x := 1 & 2 }\n");
    goo()
        .arg(path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Lex error"));
}

#[test]
fn missing_file_is_nonzero() {
    goo()
        .arg("no/such/file.go")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn runtime_error_exits_with_two() {
    let (_tmp, path) = write_program(
        "package main\nimport \"fmt\"\nvar a [3]int\nfunc main() {\n    fmt.Println(\"start\")\n    a[3] = 1\n}\n",
    );
    goo()
        .arg(path)
        .assert()
        .code(2)
        .stdout("start\n")
        .stderr(predicate::str::contains("index out of range [3] with length 3"))
        .stderr(predicate::str::contains("line 6, column 5"));
}

#[test]
fn bool_storage_is_rejected() {
    let (_tmp, path) = write_program("package main\nfunc main() {\n    var b bool\n}\n");
    goo()
        .arg(path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot assign to"));
}

#[test]
fn max_depth_flag_limits_recursion() {
    goo()
        .arg("--max-depth")
        .arg("100")
        .arg(workspace_root().join("demos/overflow.go"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("stack overflow: call depth exceeds 100"));
}

#[test]
fn max_depth_env_var_limits_recursion() {
    goo()
        .env("GOO_MAX_CALL_DEPTH", "50")
        .arg(workspace_root().join("demos/overflow.go"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("call depth exceeds 50"));
}
