use std::fmt::Write as _;

use mindroot_client::CommandRecord;
use mindroot_client::TaskResult;
use owo_colors::OwoColorize;
use serde_json::Value;

/// Command results longer than this many characters are cut in text output.
pub const MAX_RESULT_CHARS: usize = 500;

/// Renders a task result the way `mindroot` prints it without `--json`.
pub fn render_text(result: &TaskResult, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading("Results:", color));
    let _ = writeln!(out, "{}", result.results());

    if let Some(trace) = result.trace() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", heading("Full Trace:", color));
        if !trace.log_id.is_empty() {
            let _ = writeln!(out, "Log ID: {}", trace.log_id);
        }
        for (index, record) in trace.full_results.iter().enumerate() {
            render_command(&mut out, index + 1, record);
        }
    }
    out
}

pub fn render_json(result: &TaskResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn render_command(out: &mut String, position: usize, record: &CommandRecord) {
    let name = record.cmd().unwrap_or("unknown");
    let _ = writeln!(out, "\n[{position}] Command: {name}");

    let script = record
        .args()
        .filter(|_| name == "execute_command")
        .and_then(|args| args.get("cmd"))
        .and_then(Value::as_str);
    if let Some(script) = script {
        let _ = writeln!(out, "  Script:\n{script}");
    } else if let Some(args) = record.args().filter(|args| !is_empty_value(args)) {
        let pretty = serde_json::to_string_pretty(args).unwrap_or_else(|_| args.to_string());
        let _ = writeln!(out, "  Args: {pretty}");
    }

    if let Some(result) = record.result().filter(|result| !is_empty_value(result)) {
        let text = match result {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        match truncate_chars(&text, MAX_RESULT_CHARS) {
            Some(head) => {
                let _ = writeln!(out, "  Result: {head}...\n  [truncated]");
            }
            None => {
                let _ = writeln!(out, "  Result: {text}");
            }
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

/// Returns the first `max` characters when `text` is longer than that.
fn truncate_chars(text: &str, max: usize) -> Option<&str> {
    text.char_indices().nth(max).map(|(cut, _)| &text[..cut])
}
