use serde::Serialize;

use crate::cmd::DoctorArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    schema_id: &'static str,
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let checks = vec![
        platform_io_check(),
        debugger_resolvable_check(&args.gdb),
        mi_interpreter_check(&args.gdb),
    ];

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput {
        schema_id: "https://schemas.gdbmi.dev/cli/v1/doctor-report.schema.json",
        checks,
        overall,
    };

    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn platform_io_check() -> CheckResult {
    #[cfg(unix)]
    {
        CheckResult {
            name: "platform_io".to_string(),
            status: CheckStatus::Pass,
            detail: "non-blocking pipe reads available (poll)".to_string(),
        }
    }

    #[cfg(not(unix))]
    {
        CheckResult {
            name: "platform_io".to_string(),
            status: CheckStatus::Fail,
            detail: "non-blocking subprocess backend unavailable on this platform".to_string(),
        }
    }
}

fn debugger_resolvable_check(gdb: &str) -> CheckResult {
    match std::process::Command::new(gdb).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let first_line = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("")
                .to_string();
            CheckResult {
                name: "debugger_resolvable".to_string(),
                status: CheckStatus::Pass,
                detail: first_line,
            }
        }
        Ok(output) => CheckResult {
            name: "debugger_resolvable".to_string(),
            status: CheckStatus::Fail,
            detail: format!("{gdb} --version exited with {}", output.status),
        },
        Err(err) => CheckResult {
            name: "debugger_resolvable".to_string(),
            status: CheckStatus::Fail,
            detail: format!("{gdb} could not be started: {err}"),
        },
    }
}

fn mi_interpreter_check(gdb: &str) -> CheckResult {
    #[cfg(unix)]
    {
        use std::time::Duration;

        use gdbmi_process::SpawnConfig;
        use gdbmi_session::{GdbController, SessionConfig};

        use crate::cmd::debugger_command;

        let spawn = SpawnConfig::new(debugger_command(gdb, &[]));
        let mut controller = match GdbController::with_config(spawn, SessionConfig::default()) {
            Ok(controller) => controller,
            Err(err) => {
                return CheckResult {
                    name: "mi_interpreter".to_string(),
                    status: CheckStatus::Skip,
                    detail: format!("debugger did not spawn: {err}"),
                }
            }
        };

        let result = controller.write_with_timeout("-gdb-version", Duration::from_secs(3), true);
        let _ = controller.exit();
        match result {
            Ok(records) if !records.is_empty() => CheckResult {
                name: "mi_interpreter".to_string(),
                status: CheckStatus::Pass,
                detail: format!("MI session answered with {} records", records.len()),
            },
            Ok(_) | Err(_) => CheckResult {
                name: "mi_interpreter".to_string(),
                status: CheckStatus::Fail,
                detail: "MI session produced no records".to_string(),
            },
        }
    }

    #[cfg(not(unix))]
    {
        let _ = gdb;
        CheckResult {
            name: "mi_interpreter".to_string(),
            status: CheckStatus::Skip,
            detail: "MI probe not implemented on this platform".to_string(),
        }
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("gdbmi doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<22} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Skip => "SKIP",
    }
}
