use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use lexmend_core::{RepairError, TextBlock};
use thiserror::Error;

pub mod lexicon;
pub mod markup;
pub mod passes;
pub mod render;

pub use lexicon::load_lexicon;
pub use markup::parse_xhtml;
pub use passes::{read_pass, text_blocks};
pub use render::{OutputFormat, render, render_json, render_text, render_xhtml};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Repair(#[from] RepairError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Whether `path` names a markup primary rather than plain text.
pub fn is_markup_path(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    matches!(ext.as_str(), "xhtml" | "html" | "htm" | "xml")
}

/// Read the primary extraction as tagged blocks.
///
/// Dispatches on file extension:
/// - `.xhtml`, `.html`, `.htm`, `.xml` → [`parse_xhtml`]
/// - anything else → plain text, one `p` block per blank-line-separated run
pub fn read_primary(path: &Path) -> Result<Vec<TextBlock>, IngestError> {
    if is_markup_path(path) {
        let file = File::open(path)?;
        parse_xhtml(BufReader::new(file))
    } else {
        let lines = read_pass(path)?;
        Ok(text_blocks(&lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_markup_path() {
        assert!(is_markup_path(Path::new("doc.xhtml")));
        assert!(is_markup_path(Path::new("doc.HTML")));
        assert!(!is_markup_path(Path::new("doc.txt")));
        assert!(!is_markup_path(Path::new("doc")));
    }
}
