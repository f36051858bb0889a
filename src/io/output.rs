use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::stages::{PetitionResult, ResponseBody};

/// Write petition text to a file, or stdout when no path is given
pub fn write_petition(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write file: {:?}", path)),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}

/// One-line summary of a failed result for terminal output
pub fn describe_failure(result: &PetitionResult) -> Option<String> {
    match &result.body {
        ResponseBody::Success { .. } => None,
        ResponseBody::Failure {
            error,
            code,
            details,
        } => {
            let mut line = format!("{:?} ({}): {}", code, result.status, error);
            if let Some(details) = details {
                line.push_str(&format!(" - {}", details));
            }
            Some(line)
        }
    }
}
