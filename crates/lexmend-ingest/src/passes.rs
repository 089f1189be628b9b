//! Plain-text extraction passes.

use std::fs;
use std::path::Path;

use lexmend_core::{RepairError, TextBlock};

use crate::IngestError;

/// Read the lines of one extraction pass.
pub fn read_pass(path: &Path) -> Result<Vec<String>, IngestError> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|source| RepairError::InputEncoding {
        context: path.display().to_string(),
        source: Box::new(source),
    })?;
    // pdftotext-style page breaks
    let lines: Vec<String> = text
        .lines()
        .map(|line| line.replace('\u{c}', ""))
        .collect();
    tracing::debug!(path = %path.display(), lines = lines.len(), "read extraction pass");
    Ok(lines)
}

/// Split plain text into `p` blocks at blank lines.
pub fn text_blocks<S: AsRef<str>>(lines: &[S]) -> Vec<TextBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(TextBlock::new("p", std::mem::take(&mut current)));
            }
        } else {
            current.push(line.to_string());
        }
    }
    if !current.is_empty() {
        blocks.push(TextBlock::new("p", current));
    }
    blocks
}
