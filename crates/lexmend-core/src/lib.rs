use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

pub mod config;
pub mod dehyphenate;
pub mod ligature;
pub mod ligature_repair;
pub mod model;
pub mod paragraph;
pub mod pipeline;
pub mod segmenter;
pub mod trace;
pub mod vocabulary;

pub use config::{ConfigError, ListOverride, RepairConfig, RepairConfigBuilder};
pub use ligature::{LIGATURES, normalize_ligatures};
pub use model::LanguageModel;
pub use paragraph::ParagraphAssembler;
pub use pipeline::{DocumentRepairer, RepairedDocument};
pub use segmenter::{Granularity, Segmentation, Segmenter};
pub use trace::{RepairEvent, Trace};
pub use vocabulary::Vocabulary;

#[derive(Error, Debug)]
pub enum RepairError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("failed to load lexicon {}: {source}", path.display())]
    VocabularyLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The segmentation search could not reach the final cut point.
    ///
    /// Every single token is admissible, so this only happens when the search
    /// bound or the model is broken. The current document must be abandoned.
    #[error("segmentation search reached cut point {reached} of {tokens}")]
    SegmentationInvariant { tokens: usize, reached: usize },
    #[error("{context} is not valid UTF-8: {source}")]
    InputEncoding {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// One run of text between two tag boundaries of the primary extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub tag: String,
    pub lines: Vec<String>,
}

impl TextBlock {
    pub fn new(tag: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            tag: tag.into(),
            lines,
        }
    }
}

/// Output event handed to a serializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentItem {
    Open { tag: String },
    Words { words: Vec<String> },
    Close { tag: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_item_json_shape() {
        let item = DocumentItem::Open {
            tag: "p".to_string(),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"kind":"open","tag":"p"}"#);
    }
}
