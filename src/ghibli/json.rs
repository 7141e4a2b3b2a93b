//! JSON decoding with enough context to debug a bad upstream payload.

use anyhow::Result;
use serde::de::DeserializeOwned;

/// Characters of the offending line shown on each side of the error column.
const SNIPPET_RADIUS: usize = 24;

/// Decode `body`, and on failure report the serde path of the bad value, a
/// readable description of the mismatch and a snippet of the offending line.
pub fn decode_with_context<T: DeserializeOwned>(body: &str) -> Result<T> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let inner = err.inner();
        let (line, column) = (inner.line(), inner.column());

        let mut message = String::new();
        if !path.is_empty() && path != "." {
            message.push_str(&format!("at path '{path}': "));
        }
        message.push_str(&describe(&inner.to_string(), line, column));
        message.push_str(&format!(" (line {line} col {column})\n"));
        message.push_str(&snippet(body, line, column));
        anyhow::anyhow!(message)
    })
}

/// Turn serde's `invalid type: X, expected Y at line L column C` into
/// `expected Y, got X`; other messages only lose their location suffix.
fn describe(message: &str, line: usize, column: usize) -> String {
    let location = format!(" at line {line} column {column}");
    let message = message.strip_suffix(&location).unwrap_or(message);

    if let Some(rest) = message.strip_prefix("invalid type: ")
        && let Some((actual, expected)) = rest.split_once(", expected ")
    {
        return format!("expected {expected}, got {actual}");
    }
    message.to_string()
}

fn snippet(body: &str, line: usize, column: usize) -> String {
    let text = body.lines().nth(line.saturating_sub(1)).unwrap_or("");
    if text.is_empty() {
        return "(empty line)".to_string();
    }

    // serde_json columns count bytes; the caret is placed by char.
    let byte_at = column.saturating_sub(1);
    let at = text
        .char_indices()
        .take_while(|(offset, _)| *offset < byte_at)
        .count();
    let chars: Vec<char> = text.chars().collect();
    let start = at.saturating_sub(SNIPPET_RADIUS);
    let end = (at + SNIPPET_RADIUS).min(chars.len());

    let excerpt: String = chars[start..end].iter().collect();
    let marker = " ".repeat(at - start) + "^";
    format!("...{excerpt}...\n   {marker}")
}
