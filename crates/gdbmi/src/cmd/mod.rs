use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod doctor;
pub mod parse;
pub mod run;
pub mod shell;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse MI text from a file or stdin into records.
    Parse(ParseArgs),
    /// Spawn the debugger, send MI commands, print the responses.
    Run(RunArgs),
    /// Interactive MI shell against a spawned debugger.
    Shell(ShellArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Parse(args) => parse::run(args, format),
        Command::Run(args) => run::run(args, format),
        Command::Shell(args) => shell::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Doctor(args) => doctor::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// File of MI text to parse; stdin when omitted.
    pub file: Option<PathBuf>,
    /// Fail on the first line that is not MI output instead of wrapping it
    /// as an output record.
    #[arg(long)]
    pub strict: bool,
    /// Keep prompt-marker records instead of dropping them.
    #[arg(long)]
    pub keep_done: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// MI command to send; repeat for a sequence.
    #[arg(
        long = "mi",
        short = 'e',
        value_name = "COMMAND",
        required = true,
        allow_hyphen_values = true
    )]
    pub commands: Vec<String>,
    /// Debugger executable.
    #[arg(long, default_value = "gdb")]
    pub gdb: String,
    /// Extra argument appended to the debugger command line; repeatable.
    #[arg(long = "gdb-arg", value_name = "ARG")]
    pub gdb_args: Vec<String>,
    /// Response timeout per command (e.g. 5s, 500ms).
    #[arg(long, default_value = "1s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Debugger executable.
    #[arg(long, default_value = "gdb")]
    pub gdb: String,
    /// Extra argument appended to the debugger command line; repeatable.
    #[arg(long = "gdb-arg", value_name = "ARG")]
    pub gdb_args: Vec<String>,
    /// Response timeout per command (e.g. 5s, 500ms).
    #[arg(long, default_value = "1s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Debugger executable to probe.
    #[arg(long, default_value = "gdb")]
    pub gdb: String,
}

/// Build the full debugger argv from the CLI flags.
pub(crate) fn debugger_command(gdb: &str, extra_args: &[String]) -> Vec<String> {
    let mut command = vec![
        gdb.to_string(),
        "--nx".to_string(),
        "--quiet".to_string(),
        "--interpreter=mi3".to_string(),
    ];
    command.extend(extra_args.iter().cloned());
    command
}

pub(crate) fn parse_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported timeout unit: {unit}"),
        )),
    }
}
