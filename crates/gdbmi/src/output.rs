use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use gdbmi_parse::{Record, Value};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_record(record: &Record, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "TOKEN", "MESSAGE", "SOURCE", "PAYLOAD"])
                .add_row(vec![
                    record.kind.to_string(),
                    record
                        .token
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    record.message.clone().unwrap_or_else(|| "-".to_string()),
                    record
                        .source
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    payload_preview(record.payload.as_ref()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "kind={} token={} message={} payload={}",
                record.kind,
                record
                    .token
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                record.message.as_deref().unwrap_or("-"),
                payload_preview(record.payload.as_ref()),
            );
        }
        OutputFormat::Raw => match record.payload.as_ref().and_then(Value::as_scalar) {
            // Stream/output text goes through verbatim: raw mode
            // reconstructs what the debugger printed.
            Some(text) => print_raw(text.as_bytes()),
            None => println!("{}", payload_preview(record.payload.as_ref())),
        },
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn payload_preview(payload: Option<&Value>) -> String {
    match payload {
        None => "-".to_string(),
        Some(value) => serde_json::to_string(&value.to_json())
            .unwrap_or_else(|_| "<unprintable>".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_preview_folds_to_json() {
        let value = Value::Mapping(vec![(
            "msg".to_string(),
            Value::Scalar("No such file".to_string()),
        )]);
        assert_eq!(payload_preview(Some(&value)), r#"{"msg":"No such file"}"#);
        assert_eq!(payload_preview(None), "-");
    }
}
