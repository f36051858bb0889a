use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Read an intake form JSON file
///
/// Returns the raw value; validation is left to the normalizer so the CLI
/// and the HTTP server apply the same policy. An empty file yields `None`.
pub fn read_intake_file(path: &Path) -> Result<Option<Value>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_intake_json(&content)
}

/// Parse intake JSON text
pub fn parse_intake_json(json: &str) -> Result<Option<Value>> {
    if json.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(json).context("Failed to parse intake JSON")?;
    Ok(Some(value))
}
