//! Request and response bodies exchanged with the `/task/{agent}` endpoint.

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;

use crate::error::UNKNOWN_API_ERROR;

/// Value of `status` marking an application-level failure.
pub(crate) const STATUS_ERROR: &str = "error";

/// Body of `POST /task/{agent}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRequest<'a> {
    pub instructions: &'a str,
}

/// Raw response body, kept as the JSON object the server sent.
///
/// Fields are read on demand and never type-checked as a whole, so an
/// unexpected shape in a field the caller did not ask for cannot fail the
/// call. Anything other than a JSON object is rejected when parsing.
#[derive(Debug, Default)]
pub(crate) struct TaskResponse(Map<String, Value>);

impl TaskResponse {
    pub(crate) fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body).map(Self)
    }

    pub(crate) fn is_error(&self) -> bool {
        self.0.get("status").and_then(Value::as_str) == Some(STATUS_ERROR)
    }

    /// Message of an error payload, or the generic placeholder.
    pub(crate) fn error_message(&self) -> String {
        self.text("message")
            .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string())
    }

    pub(crate) fn into_result(mut self, include_trace: bool) -> TaskResult {
        let results = self.text("results").unwrap_or_default();
        let trace = include_trace.then(|| TaskTrace {
            full_results: self.take_records(),
            log_id: self.text("log_id").unwrap_or_default(),
        });
        TaskResult { results, trace }
    }

    /// Reads `key` as text. Strings are returned as-is, other non-null
    /// values in their JSON form.
    fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    fn take_records(&mut self) -> Vec<CommandRecord> {
        match self.0.remove("full_results") {
            Some(Value::Array(records)) => records.into_iter().map(CommandRecord::new).collect(),
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                debug!(full_results = %other, "ignoring non-list full_results");
                Vec::new()
            }
        }
    }
}

/// Normalized outcome of a task run.
///
/// Serializes flat, so a traced result looks like
/// `{"results": ..., "full_results": [...], "log_id": ...}` and an untraced
/// one carries only `results`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskResult {
    pub results: String,
    #[serde(flatten)]
    pub trace: Option<TaskTrace>,
}

impl TaskResult {
    pub fn results(&self) -> &str {
        &self.results
    }

    pub fn trace(&self) -> Option<&TaskTrace> {
        self.trace.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskTrace {
    pub full_results: Vec<CommandRecord>,
    pub log_id: String,
}

/// One command the agent executed. The schema belongs to the server, so the
/// record is kept as received and only read through lenient accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CommandRecord(Value);

impl CommandRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn cmd(&self) -> Option<&str> {
        self.0.get("cmd").and_then(Value::as_str)
    }

    pub fn args(&self) -> Option<&Value> {
        self.0.get("args").filter(|args| !args.is_null())
    }

    pub fn result(&self) -> Option<&Value> {
        self.0.get("result").filter(|result| !result.is_null())
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response(body: Value) -> TaskResponse {
        TaskResponse::parse(&body.to_string()).unwrap()
    }

    #[test]
    fn untraced_result_drops_trace_fields() {
        let result = response(json!({
            "status": "ok",
            "results": "done",
            "full_results": [{"cmd": "say", "result": "hi"}],
            "log_id": "log-1",
        }))
        .into_result(false);

        assert_eq!(result.trace, None);
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"results": "done"}));
    }

    #[test]
    fn traced_result_defaults_missing_fields() {
        let result = response(json!({"status": "ok"})).into_result(true);

        assert_eq!(
            result,
            TaskResult {
                results: String::new(),
                trace: Some(TaskTrace::default()),
            }
        );
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"results": "", "full_results": [], "log_id": ""})
        );
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let result = response(json!({"results": null, "log_id": null, "full_results": null}))
            .into_result(true);
        assert_eq!(result.results(), "");
        assert_eq!(result.trace(), Some(&TaskTrace::default()));
    }

    #[test]
    fn odd_field_types_do_not_fail_the_payload() {
        let untraced = response(json!({
            "status": "ok",
            "results": "hello",
            "full_results": {"not": "a list"},
            "log_id": 7,
        }))
        .into_result(false);
        assert_eq!(untraced.results(), "hello");
        assert_eq!(untraced.trace(), None);

        let traced = response(json!({
            "results": 42,
            "full_results": {"not": "a list"},
            "log_id": 7,
        }))
        .into_result(true);
        assert_eq!(traced.results(), "42");
        assert_eq!(
            traced.trace(),
            Some(&TaskTrace {
                full_results: Vec::new(),
                log_id: "7".to_string(),
            })
        );
    }

    #[test]
    fn error_status_and_message_are_read_leniently() {
        let error = response(json!({"status": "error", "message": "X", "log_id": 42}));
        assert!(error.is_error());
        assert_eq!(error.error_message(), "X");

        let structured = response(json!({"status": "error", "message": {"code": 3}}));
        assert_eq!(structured.error_message(), r#"{"code":3}"#);

        assert_eq!(
            response(json!({"status": "error"})).error_message(),
            UNKNOWN_API_ERROR
        );
        assert!(!response(json!({"status": "ok"})).is_error());
        assert!(!response(json!({"status": 1})).is_error());
        assert!(!response(json!({})).is_error());
    }

    #[test]
    fn only_json_objects_are_accepted() {
        assert!(TaskResponse::parse("[]").is_err());
        assert!(TaskResponse::parse(r#"["error", "X"]"#).is_err());
        assert!(TaskResponse::parse(r#""ok""#).is_err());
        assert!(TaskResponse::parse("{}").is_ok());
    }

    #[test]
    fn command_record_passes_unknown_shapes_through() {
        let record = CommandRecord::new(json!({
            "cmd": "execute_command",
            "args": {"cmd": "ls"},
            "extra": [1, 2, 3],
        }));
        assert_eq!(record.cmd(), Some("execute_command"));
        assert_eq!(record.args(), Some(&json!({"cmd": "ls"})));
        assert_eq!(record.result(), None);
        assert_eq!(record.as_value()["extra"], json!([1, 2, 3]));

        let odd = CommandRecord::new(json!("not an object"));
        assert_eq!(odd.cmd(), None);
    }
}
