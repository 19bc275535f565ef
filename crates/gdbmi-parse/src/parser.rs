//! Record classification: one complete line in, one [`Record`] out.

use tracing::debug;

use crate::error::{Result, StructuralError};
use crate::grammar;
use crate::record::{Record, RecordKind};

/// The prompt marker GDB prints after each output batch.
const PROMPT: &str = "(gdb)";

/// True when `line` is the prompt marker ending one output batch.
///
/// Consumers group consecutive records up to this marker to reconstruct one
/// logical response.
pub fn response_is_finished(line: &str) -> bool {
    match line.strip_prefix(PROMPT) {
        Some(rest) => rest.chars().all(char::is_whitespace),
        None => false,
    }
}

/// Parse one complete line (newline already stripped) into a [`Record`].
///
/// Fails with [`StructuralError`] when the line matches no record form.
/// A result/async record with a class but no payload (`=event`, `*stopped`)
/// is valid and yields `payload = None`. The returned record's `source` is
/// `None`; the session layer stamps it when lines arrive through a framer.
pub fn parse_line(line: &str) -> Result<Record> {
    if response_is_finished(line) {
        return Ok(Record::done());
    }

    let bytes = line.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let token = if pos > 0 { line[..pos].parse().ok() } else { None };

    let record = match bytes.get(pos).copied() {
        Some(b'^') => classify_result(line, pos + 1, token, RecordKind::Result),
        Some(b'*') => classify_result(line, pos + 1, token, RecordKind::Exec),
        Some(b'+') => classify_result(line, pos + 1, token, RecordKind::Status),
        Some(b'=') => classify_result(line, pos + 1, token, RecordKind::Notify),
        // Stream records never carry a token; a digit run before one of
        // these sigils means the line is not MI output.
        Some(b'~') if pos == 0 => classify_stream(line, RecordKind::Console),
        Some(b'@') if pos == 0 => classify_stream(line, RecordKind::Target),
        Some(b'&') if pos == 0 => classify_stream(line, RecordKind::Log),
        _ => Err(StructuralError::unrecognized(line)),
    }?;

    debug!(kind = %record.kind, message = record.message.as_deref(), "parsed record");
    Ok(record)
}

/// Classify `^ * + =` records: `class[,mapping-body]`.
fn classify_result(
    line: &str,
    start: usize,
    token: Option<u64>,
    kind: RecordKind,
) -> Result<Record> {
    let rest = &line[start..];
    let (class, body_at) = match rest.find(',') {
        Some(idx) => (&rest[..idx], Some(start + idx + 1)),
        None => (rest, None),
    };
    let class = class.trim();
    if class.is_empty() {
        return Err(StructuralError::unrecognized(line));
    }

    let payload = match body_at {
        Some(at) => {
            let (value, _) = grammar::parse_mapping_body(line, at)?;
            Some(value)
        }
        None => None,
    };

    Ok(Record::new(kind, token, Some(class.to_string()), payload))
}

/// Classify `~ @ &` records: the remainder is a single quoted scalar.
fn classify_stream(line: &str, kind: RecordKind) -> Result<Record> {
    if line.as_bytes().get(1) != Some(&b'"') {
        return Err(StructuralError::unrecognized(line));
    }
    let (value, _) = grammar::parse_value(line, 1)?;
    Ok(Record::new(kind, None, None, Some(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;

    fn scalar(s: &str) -> Value {
        Value::Scalar(s.to_string())
    }

    fn mapping(pairs: &[(&str, Value)]) -> Value {
        Value::Mapping(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn bare_result_record() {
        let record = parse_line("^done").unwrap();
        assert_eq!(record.kind, RecordKind::Result);
        assert_eq!(record.message.as_deref(), Some("done"));
        assert_eq!(record.token, None);
        assert_eq!(record.payload, None);
        assert_eq!(record.source, None);
    }

    #[test]
    fn result_record_with_nested_payload() {
        let record =
            parse_line(r#"^done,bkpt={number="1",type="breakpoint",line="68"}"#).unwrap();
        assert_eq!(record.kind, RecordKind::Result);
        assert_eq!(record.message.as_deref(), Some("done"));
        assert_eq!(
            record.payload,
            Some(mapping(&[(
                "bkpt",
                mapping(&[
                    ("number", scalar("1")),
                    ("type", scalar("breakpoint")),
                    ("line", scalar("68")),
                ])
            )]))
        );
    }

    #[test]
    fn result_record_with_token() {
        let record = parse_line("1342^done").unwrap();
        assert_eq!(record.token, Some(1342));
        assert_eq!(record.message.as_deref(), Some("done"));

        let record = parse_line(r#"42^error,msg="No such file""#).unwrap();
        assert_eq!(record.kind, RecordKind::Result);
        assert_eq!(record.token, Some(42));
        assert_eq!(record.message.as_deref(), Some("error"));
        assert_eq!(
            record.payload,
            Some(mapping(&[("msg", scalar("No such file"))]))
        );
    }

    #[test]
    fn error_result_with_escapes() {
        let record = parse_line(r#"^error,msg="message\twith\nescapes""#).unwrap();
        assert_eq!(
            record.payload,
            Some(mapping(&[("msg", scalar("message\twith\nescapes"))]))
        );

        let record = parse_line(r#"^error,msg="This is a double quote: <\">""#).unwrap();
        assert_eq!(
            record.payload,
            Some(mapping(&[("msg", scalar("This is a double quote: <\">"))]))
        );
    }

    #[test]
    fn notify_record() {
        let record = parse_line(r#"=thread-group-added,id="i1""#).unwrap();
        assert_eq!(record.kind, RecordKind::Notify);
        assert_eq!(record.message.as_deref(), Some("thread-group-added"));
        assert_eq!(record.payload, Some(mapping(&[("id", scalar("i1"))])));
        assert_eq!(record.token, None);
    }

    #[test]
    fn notify_record_without_payload_is_valid() {
        let record = parse_line("=event").unwrap();
        assert_eq!(record.kind, RecordKind::Notify);
        assert_eq!(record.message.as_deref(), Some("event"));
        assert_eq!(record.payload, None);
    }

    #[test]
    fn exec_records() {
        let record = parse_line(r#"*running,thread-id="all""#).unwrap();
        assert_eq!(record.kind, RecordKind::Exec);
        assert_eq!(record.message.as_deref(), Some("running"));
        assert_eq!(
            record.payload,
            Some(mapping(&[("thread-id", scalar("all"))]))
        );

        let record = parse_line("*stopped").unwrap();
        assert_eq!(record.kind, RecordKind::Exec);
        assert_eq!(record.message.as_deref(), Some("stopped"));
        assert_eq!(record.payload, None);
    }

    #[test]
    fn status_record() {
        let record = parse_line(r#"+download,section=".text",section-size="6668""#).unwrap();
        assert_eq!(record.kind, RecordKind::Status);
        assert_eq!(record.message.as_deref(), Some("download"));
        assert_eq!(
            record.payload,
            Some(mapping(&[
                ("section", scalar(".text")),
                ("section-size", scalar("6668")),
            ]))
        );
    }

    #[test]
    fn stream_records() {
        for (line, kind) in [
            (r#"~"done""#, RecordKind::Console),
            (r#"@"done""#, RecordKind::Target),
            (r#"&"done""#, RecordKind::Log),
        ] {
            let record = parse_line(line).unwrap();
            assert_eq!(record.kind, kind);
            assert_eq!(record.message, None);
            assert_eq!(record.token, None);
            assert_eq!(record.payload, Some(scalar("done")));
        }
    }

    #[test]
    fn empty_stream_records() {
        for line in [r#"~"""#, r#"@"""#, r#"&"""#] {
            let record = parse_line(line).unwrap();
            assert_eq!(record.payload, Some(scalar("")));
        }
    }

    #[test]
    fn stream_record_decodes_escapes() {
        let record = parse_line(r#"~"Reading symbols...\n""#).unwrap();
        assert_eq!(record.kind, RecordKind::Console);
        assert_eq!(record.payload, Some(scalar("Reading symbols...\n")));

        let record = parse_line(r#"&"\b\f\n\r\t\"""#).unwrap();
        assert_eq!(record.payload, Some(scalar("\u{8}\u{c}\n\r\t\"")));
    }

    #[test]
    fn stream_record_with_escaped_backslash() {
        let record = parse_line(r#"&"\\""#).unwrap();
        assert_eq!(record.payload, Some(scalar("\\")));
    }

    #[test]
    fn duplicate_keys_survive_classification() {
        let record = parse_line(
            r#"^done,thread-ids={thread-id="3",thread-id="2",thread-id="1"}, current-thread-id="1",number-of-threads="3""#,
        )
        .unwrap();
        let payload = record.payload.unwrap();
        assert_eq!(
            payload.get("thread-ids"),
            Some(&mapping(&[
                ("thread-id", scalar("3")),
                ("thread-id", scalar("2")),
                ("thread-id", scalar("1")),
            ]))
        );
        assert_eq!(
            payload.get("current-thread-id").and_then(Value::as_scalar),
            Some("1")
        );
        assert_eq!(
            payload.get("number-of-threads").and_then(Value::as_scalar),
            Some("3")
        );
    }

    #[test]
    fn breakpoint_modified_real_world_record() {
        let record = parse_line(
            r#"=breakpoint-modified,bkpt={number="1",empty_arr=[],type="breakpoint",disp="keep",enabled="y",addr="0x000000000040059c",func="main",file="hello.c",fullname="/home/hello.c",line="9",thread-groups=["i1"],times="1",original-location="hello.c:9"}"#,
        )
        .unwrap();
        assert_eq!(record.kind, RecordKind::Notify);
        assert_eq!(record.message.as_deref(), Some("breakpoint-modified"));
        let bkpt = record.payload.unwrap();
        let bkpt = bkpt.get("bkpt").unwrap();
        assert_eq!(bkpt.get("number").and_then(Value::as_scalar), Some("1"));
        assert_eq!(bkpt.get("empty_arr"), Some(&Value::Sequence(Vec::new())));
        assert_eq!(
            bkpt.get("thread-groups"),
            Some(&Value::Sequence(vec![scalar("i1")]))
        );
        assert_eq!(
            bkpt.get("original-location").and_then(Value::as_scalar),
            Some("hello.c:9")
        );
    }

    #[test]
    fn garbage_after_payload_value_is_discarded() {
        let record = parse_line(r#"=event,name="gdb"discardme"#).unwrap();
        assert_eq!(record.kind, RecordKind::Notify);
        assert_eq!(record.payload, Some(mapping(&[("name", scalar("gdb"))])));
    }

    #[test]
    fn prompt_marker_is_a_done_record() {
        for line in ["(gdb)", "(gdb) ", "(gdb)\t"] {
            assert!(response_is_finished(line), "{line:?}");
            let record = parse_line(line).unwrap();
            assert!(record.is_done());
            assert_eq!(record.payload, None);
        }
        assert!(!response_is_finished("(gdb) extra"));
        assert!(!response_is_finished("^done"));
    }

    #[test]
    fn plain_text_is_a_structural_error() {
        let err = parse_line("done").unwrap_err();
        assert!(matches!(err, StructuralError::UnrecognizedLine { .. }));

        let err = parse_line("Reading symbols from a.out...").unwrap_err();
        assert!(matches!(err, StructuralError::UnrecognizedLine { .. }));
    }

    #[test]
    fn empty_line_is_a_structural_error() {
        assert!(parse_line("").is_err());
    }

    #[test]
    fn bare_token_is_a_structural_error() {
        assert!(parse_line("1342").is_err());
    }

    #[test]
    fn token_before_stream_sigil_is_a_structural_error() {
        assert!(parse_line(r#"12~"text""#).is_err());
    }

    #[test]
    fn empty_class_is_a_structural_error() {
        assert!(parse_line("^").is_err());
        assert!(parse_line(r#"^,msg="x""#).is_err());
    }

    #[test]
    fn unquoted_stream_remainder_is_a_structural_error() {
        assert!(parse_line("~plain").is_err());
    }

    #[test]
    fn malformed_payload_propagates_structural_error() {
        let err = parse_line(r#"^done,msg="unterminated"#).unwrap_err();
        assert!(matches!(err, StructuralError::UnterminatedString { .. }));

        let err = parse_line(r#"^done,stack=[{a="1"}"#).unwrap_err();
        assert!(matches!(
            err,
            StructuralError::UnclosedDelimiter { delim: '[', .. }
        ));
    }

    #[test]
    fn trailing_comma_yields_empty_payload() {
        let record = parse_line("^done,").unwrap();
        assert_eq!(record.payload, Some(Value::Mapping(Vec::new())));
    }

    #[test]
    fn record_serializes_to_json_with_folded_payload() {
        let record = parse_line(r#"42^error,msg="No such file""#).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "result",
                "token": 42,
                "message": "error",
                "payload": { "msg": "No such file" },
            })
        );
    }
}
