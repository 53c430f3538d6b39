use serde_json::Value;
use std::io::{self, Read};

/// Piped calculator input. `None` when stdin is a terminal or carries only
/// whitespace, so the caller can fall back to flags.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let parsed = serde_json::from_str(raw.trim())
        .map_err(|e| format!("Failed to parse stdin as JSON: {e}"))?;
    tracing::debug!(bytes = raw.len(), "read input from stdin");
    Ok(Some(parsed))
}
