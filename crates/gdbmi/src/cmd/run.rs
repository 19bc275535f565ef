use gdbmi_process::SpawnConfig;
use gdbmi_session::{GdbController, SessionConfig};

use crate::cmd::{debugger_command, parse_timeout, RunArgs};
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_record, OutputFormat};

pub fn run(args: RunArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_timeout(&args.timeout)?;
    let spawn = SpawnConfig::new(debugger_command(&args.gdb, &args.gdb_args));

    let mut controller = GdbController::with_config(spawn, SessionConfig::default())
        .map_err(|err| session_error("spawning debugger", err))?;

    // The debugger front-loads banner records (thread groups, feature
    // notifications) before the first command; surface them too.
    let banner = controller
        .get_response(timeout, false)
        .map_err(|err| session_error("reading startup output", err))?;
    for record in &banner {
        print_record(record, format);
    }

    for command in &args.commands {
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
