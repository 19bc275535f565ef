mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "gdbmi", version, about = "Structured GDB/MI CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parse_subcommand() {
        let cli = Cli::try_parse_from(["gdbmi", "parse", "output.txt", "--strict"])
            .expect("parse args should parse");
        assert!(matches!(cli.command, Command::Parse(_)));
    }

    #[test]
    fn parses_run_subcommand_with_repeated_commands() {
        let cli = Cli::try_parse_from([
            "gdbmi",
            "run",
            "-e",
            "-break-insert main",
            "-e",
            "-exec-run",
            "--timeout",
            "3s",
        ])
        .expect("run args should parse");

        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.commands, vec!["-break-insert main", "-exec-run"]);
                assert_eq!(args.gdb, "gdb");
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn run_requires_at_least_one_command() {
        let err = Cli::try_parse_from(["gdbmi", "run"]).expect_err("missing -e should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn parses_global_format_flag() {
        let cli = Cli::try_parse_from(["gdbmi", "--format", "json", "version"])
            .expect("global flag should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }
}
