use std::io::BufRead;

use gdbmi_process::SpawnConfig;
use gdbmi_session::{GdbController, SessionConfig};

use crate::cmd::{debugger_command, parse_timeout, ShellArgs};
use crate::exit::{io_error, session_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_record, OutputFormat};

pub fn run(args: ShellArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_timeout(&args.timeout)?;
    let spawn = SpawnConfig::new(debugger_command(&args.gdb, &args.gdb_args));

    let mut controller = GdbController::with_config(spawn, SessionConfig::default())
        .map_err(|err| session_error("spawning debugger", err))?;

    // Ctrl-C interrupts the debugger's target, not this shell.
    let pid = controller.pid();
    ctrlc::set_handler(move || {
        let _ = gdbmi_process::signal::interrupt(pid);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("installing Ctrl-C handler: {err}")))?;

    let banner = controller
        .get_response(timeout, false)
        .map_err(|err| session_error("reading startup output", err))?;
    for record in &banner {
        print_record(record, format);
    }

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|err| io_error("reading command", err))?;
        if read == 0 {
            break;
        }

        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if command == "quit" || command == "-gdb-exit" {
            break;
        }

        let records = controller
            .write_with_timeout(command, timeout, false)
            .map_err(|err| session_error(&format!("running {command:?}"), err))?;
        for record in &records {
            print_record(record, format);
        }
    }

    controller
        .exit()
        .map_err(|err| session_error("terminating debugger", err))?;
    Ok(SUCCESS)
}
