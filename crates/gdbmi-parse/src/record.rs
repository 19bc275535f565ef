use gdbmi_frame::StreamSource;
use serde::{Serialize, Serializer};

/// One fully parsed logical unit of debugger output.
///
/// Records are immutable once constructed and owned solely by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Record kind, selected by the leading sigil.
    pub kind: RecordKind,
    /// Correlation id echoed back from the originating command, if any.
    ///
    /// Present only on result/exec/status/notify records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<u64>,
    /// Result or async class name (`done`, `stopped`, `breakpoint-modified`).
    ///
    /// Absent for stream and output records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Structured payload, when the record carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// The subprocess stream the record arrived on.
    ///
    /// Stamped by the session layer; `None` when a line was parsed directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<StreamSource>,
}

impl Record {
    pub(crate) fn new(
        kind: RecordKind,
        token: Option<u64>,
        message: Option<String>,
        payload: Option<Value>,
    ) -> Self {
        Self {
            kind,
            token,
            message,
            payload,
            source: None,
        }
    }

    /// The control record for the prompt marker ending an output batch.
    pub fn done() -> Self {
        Self::new(RecordKind::Done, None, None, None)
    }

    /// Wrap a non-MI line (text printed by the program being debugged).
    pub fn output(text: impl Into<String>) -> Self {
        Self::new(
            RecordKind::Output,
            None,
            None,
            Some(Value::Scalar(text.into())),
        )
    }

    /// True for the prompt-marker control record.
    pub fn is_done(&self) -> bool {
        self.kind == RecordKind::Done
    }
}

/// Record kinds, one per sigil plus the two synthesized kinds.
///
/// `Output` is never produced by the classifier itself — the session layer
/// uses it to wrap lines that fail classification. `Done` is the prompt
/// marker; callers typically ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// `^` — response to an MI command.
    Result,
    /// `*` — exec async record (target state changes).
    Exec,
    /// `+` — status async record (progress of a slow operation).
    Status,
    /// `=` — notify async record (other changes worth reporting).
    Notify,
    /// `~` — console stream text.
    Console,
    /// `&` — log stream (the debugger's own echo/debug text).
    Log,
    /// `@` — target stream output.
    Target,
    /// A line that was not MI output at all.
    Output,
    /// The prompt marker ending one output batch.
    Done,
}

impl RecordKind {
    pub fn name(self) -> &'static str {
        match self {
            RecordKind::Result => "result",
            RecordKind::Exec => "exec",
            RecordKind::Status => "status",
            RecordKind::Notify => "notify",
            RecordKind::Console => "console",
            RecordKind::Log => "log",
            RecordKind::Target => "target",
            RecordKind::Output => "output",
            RecordKind::Done => "done",
        }
    }

    /// True for the async record kinds (`* + =`).
    pub fn is_async(self) -> bool {
        matches!(self, RecordKind::Exec | RecordKind::Status | RecordKind::Notify)
    }

    /// True for the textual stream kinds (`~ @ &`), whose payload is always
    /// a single scalar.
    pub fn is_stream(self) -> bool {
        matches!(self, RecordKind::Console | RecordKind::Log | RecordKind::Target)
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A structured MI value: scalar string, ordered sequence, or mapping.
///
/// A mapping keeps every key/value pair in source order, duplicate keys
/// included — GDB is known to emit repeated keys (e.g.
/// `thread-ids={thread-id="1",thread-id="2"}`) and the parser never drops
/// data. Callers that want plain JSON can fold duplicates with
/// [`Value::to_json`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(String),
    Sequence(Vec<Value>),
    Mapping(Vec<(String, Value)>),
}

impl Value {
    /// The scalar text, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// First value stored under `key`, if this is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Mapping(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Convert to JSON, folding duplicate mapping keys into arrays.
    ///
    /// `{a="1",a="2"}` becomes `{"a":["1","2"]}` — the repeated-key
    /// workaround consumers expect for the known GDB duplicate-key bug.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Scalar(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Mapping(pairs) => {
                let mut map = serde_json::Map::new();
                for (key, value) in pairs {
                    let json = value.to_json();
                    match map.get_mut(key) {
                        None => {
                            map.insert(key.clone(), json);
                        }
                        Some(serde_json::Value::Array(existing)) => existing.push(json),
                        Some(existing) => {
                            let first = existing.take();
                            *existing = serde_json::Value::Array(vec![first, json]);
                        }
                    }
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_get_returns_first_match() {
        let value = Value::Mapping(vec![
            ("a".to_string(), Value::Scalar("1".to_string())),
            ("a".to_string(), Value::Scalar("2".to_string())),
        ]);
        assert_eq!(value.get("a").and_then(Value::as_scalar), Some("1"));
        assert_eq!(value.get("b"), None);
    }

    #[test]
    fn to_json_folds_duplicate_keys() {
        let value = Value::Mapping(vec![
            ("thread-id".to_string(), Value::Scalar("1".to_string())),
            ("thread-id".to_string(), Value::Scalar("2".to_string())),
            ("thread-id".to_string(), Value::Scalar("3".to_string())),
        ]);
        assert_eq!(
            value.to_json(),
            serde_json::json!({ "thread-id": ["1", "2", "3"] })
        );
    }

    #[test]
    fn to_json_preserves_unique_keys() {
        let value = Value::Mapping(vec![
            ("number".to_string(), Value::Scalar("1".to_string())),
            ("empty".to_string(), Value::Sequence(Vec::new())),
        ]);
        assert_eq!(
            value.to_json(),
            serde_json::json!({ "number": "1", "empty": [] })
        );
    }

    #[test]
    fn record_json_skips_absent_fields() {
        let record = Record::done();
        let json = serde_json::to_value(&record).expect("record should serialize");
        assert_eq!(json, serde_json::json!({ "kind": "done" }));
    }

    #[test]
    fn output_record_wraps_raw_text() {
        let record = Record::output("hello from the inferior");
        assert_eq!(record.kind, RecordKind::Output);
        assert_eq!(
            record.payload.as_ref().and_then(Value::as_scalar),
            Some("hello from the inferior")
        );
    }

    #[test]
    fn kind_predicates() {
        assert!(RecordKind::Notify.is_async());
        assert!(RecordKind::Status.is_async());
        assert!(!RecordKind::Result.is_async());
        assert!(RecordKind::Console.is_stream());
        assert!(!RecordKind::Output.is_stream());
    }
}
