//! Assembles repaired blocks into paragraph-tagged output.

use crate::DocumentItem;
use crate::config::RepairConfig;
use crate::trace::{RepairEvent, Trace};

const TERMINAL_PUNCTUATION: [char; 3] = ['.', '?', '!'];

#[derive(Debug)]
struct OpenParagraph {
    tag: String,
    words: Vec<String>,
}

/// Decides, block by block, whether a paragraph continues or a new one opens.
///
/// Blocks must be pushed in document order.
#[derive(Debug)]
pub struct ParagraphAssembler {
    config: RepairConfig,
    open: Option<OpenParagraph>,
    items: Vec<DocumentItem>,
}

impl ParagraphAssembler {
    pub fn from_config(config: &RepairConfig) -> Self {
        Self {
            config: config.clone(),
            open: None,
            items: Vec::new(),
        }
    }

    /// Feed one block. A non-paragraph tag closes the open paragraph even
    /// when the block has no words.
    pub fn push(&mut self, tag: &str, words: Vec<String>, trace: &mut Trace) {
        if !self.config.is_paragraph_tag(tag) {
            self.close();
            if words.is_empty() {
                return;
            }
            self.items.push(DocumentItem::Open {
                tag: tag.to_string(),
            });
            self.items.push(DocumentItem::Words { words });
            self.items.push(DocumentItem::Close {
                tag: tag.to_string(),
            });
            return;
        }
        if words.is_empty() {
            return;
        }

        let auto_merge = self.config.auto_merge_paragraphs();
        let never_split = self.config.never_split_paragraphs();
        let continues = auto_merge && (never_split || starts_lowercase(&words[0]));

        if continues && let Some(open) = self.open.as_mut() {
            trace.record(RepairEvent::ParagraphContinued {
                tag: open.tag.clone(),
                first_word: words[0].clone(),
            });
            open.words.extend(words);
        } else {
            self.close();
            self.open = Some(OpenParagraph {
                tag: tag.to_string(),
                words,
            });
        }

        let finished = !auto_merge
            || (!never_split
                && self
                    .open
                    .as_ref()
                    .and_then(|open| open.words.last())
                    .is_some_and(|last| last.ends_with(TERMINAL_PUNCTUATION)));
        if finished {
            self.close();
        }
    }

    fn close(&mut self) {
        if let Some(open) = self.open.take() {
            self.items.push(DocumentItem::Open {
                tag: open.tag.clone(),
            });
            self.items.push(DocumentItem::Words { words: open.words });
            self.items.push(DocumentItem::Close { tag: open.tag });
        }
    }

    /// Close any open paragraph and return every item in order.
    pub fn finish(mut self) -> Vec<DocumentItem> {
        self.close();
        self.items
    }
}

fn starts_lowercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_lowercase)
}
