use std::io::Read;

use gdbmi_parse::{parse_line, Record};

use crate::cmd::ParseArgs;
use crate::exit::{io_error, parse_error, CliResult, SUCCESS};
use crate::output::{print_record, OutputFormat};

pub fn run(args: ParseArgs, format: OutputFormat) -> CliResult<i32> {
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| io_error(&format!("reading {}", path.display()), err))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| io_error("reading stdin", err))?;
            buf
        }
    };

    for (lineno, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(record) if record.is_done() && !args.keep_done => {}
            Ok(record) => print_record(&record, format),
            Err(err) if args.strict => {
                return Err(parse_error(&format!("line {}", lineno + 1), err));
            }
            Err(_) => print_record(&Record::output(line), format),
        }
    }

    Ok(SUCCESS)
}
