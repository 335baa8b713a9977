//! Post-processing of generated output into display text.
use serde_json::Value;

/// Coerces an `output` value into display text.
///
/// Strings are used as-is, any other JSON value is serialized compactly. The
/// text is then rewritten: every `**` marker is removed, then every literal
/// `\n` escape sequence becomes a real line break.
pub fn normalize_output(output: &Value) -> String {
    let text = match output {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    normalize_text(&text)
}

/// Applies the markdown emphasis and newline rewrites to `text`.
pub fn normalize_text(text: &str) -> String {
    text.replace("**", "").replace("\\n", "\n")
}
