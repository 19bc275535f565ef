#![cfg(all(unix, feature = "cli"))]

use std::io::Write;
use std::process::{Command, Stdio};

fn gdbmi() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gdbmi"))
}

fn run_parse(input: &str, extra_args: &[&str]) -> std::process::Output {
    let mut child = gdbmi()
        .arg("--format")
        .arg("json")
        .arg("--log-level")
        .arg("error")
        .arg("parse")
        .args(extra_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("gdbmi parse should start");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(input.as_bytes())
        .expect("input should be writable");

    child.wait_with_output().expect("gdbmi parse should finish")
}

#[test]
fn parse_emits_one_json_record_per_line() {
    let input = "=thread-group-added,id=\"i1\"\n\
                 ^done,bkpt={number=\"1\",type=\"breakpoint\",line=\"68\"}\n\
                 (gdb)\n";
    let output = run_parse(input, &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout should be UTF-8");
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be JSON"))
        .collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["kind"], "notify");
    assert_eq!(records[0]["message"], "thread-group-added");
    assert_eq!(records[0]["payload"]["id"], "i1");
    assert_eq!(records[1]["kind"], "result");
    assert_eq!(records[1]["payload"]["bkpt"]["line"], "68");
}

#[test]
fn parse_wraps_non_mi_lines_as_output_records() {
    let output = run_parse("not mi output\n^done\n", &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["kind"], "output");
    assert_eq!(records[0]["payload"], "not mi output");
    assert_eq!(records[1]["kind"], "result");
}

#[test]
fn strict_parse_fails_on_non_mi_input() {
    let output = run_parse("garbage line\n", &["--strict"]);
    assert_eq!(output.status.code(), Some(60));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("line 1"), "stderr was: {stderr}");
}

#[test]
fn parse_keeps_prompt_records_on_request() {
    let output = run_parse("(gdb)\n", &["--keep-done"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let record: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(record["kind"], "done");
}

#[test]
fn version_prints_package_version() {
    let output = gdbmi()
        .arg("version")
        .output()
        .expect("version should run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn doctor_fails_cleanly_without_a_debugger() {
    let output = gdbmi()
        .arg("--format")
        .arg("json")
        .arg("doctor")
        .arg("--gdb")
        .arg("definitely-not-a-debugger-binary")
        .output()
        .expect("doctor should run");

    assert_eq!(output.status.code(), Some(30));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let report: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(report["overall"], "fail");
}
