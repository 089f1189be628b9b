//! XHTML parser for the primary extraction.
//!
//! Uses SAX-style event processing to cut the document into tagged text
//! runs. Every element that is neither inline nor a structural wrapper opens
//! a block; inline formatting (`<b>`, `<i>`, `<span>` ...) folds its text into
//! the enclosing block and `<br/>` ends a line.

use std::io::BufRead;

use lexmend_core::{RepairError, TextBlock};
use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use quick_xml::events::Event;

use crate::IngestError;

const INLINE_ELEMENTS: &[&[u8]] = &[
    b"a", b"b", b"i", b"em", b"strong", b"span", b"font", b"sub", b"sup", b"tt", b"u", b"small",
];

/// Containers that never become blocks themselves.
const WRAPPER_ELEMENTS: &[&[u8]] = &[b"html", b"body", b"div", b"page", b"document"];

/// Elements whose content is not document text.
const SKIPPED_ELEMENTS: &[&[u8]] = &[b"head", b"script", b"style"];

/// Tag given to text found directly inside a wrapper.
const STRAY_TEXT_TAG: &str = "p";

fn is_one_of(set: &[&[u8]], name: &[u8]) -> bool {
    set.iter().any(|&e| e.eq_ignore_ascii_case(name))
}

/// The handful of HTML entities extractors emit in XHTML output.
fn resolve_html_entity(entity: &str) -> Option<&'static str> {
    match entity {
        "nbsp" => Some("\u{a0}"),
        "shy" => Some("\u{ad}"),
        "ndash" => Some("\u{2013}"),
        "mdash" => Some("\u{2014}"),
        "hellip" => Some("\u{2026}"),
        _ => resolve_predefined_entity(entity),
    }
}

/// Accumulates the lines of the block being read.
#[derive(Default)]
struct BlockBuilder {
    lines: Vec<String>,
    line: String,
}

impl BlockBuilder {
    fn push_text(&mut self, text: &str) {
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            self.line.push_str(first);
        }
        for part in parts {
            self.break_line();
            self.line.push_str(part);
        }
    }

    fn break_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.line));
    }

    /// Emit the accumulated text as a block, dropping blank lines.
    ///
    /// With `keep_empty` a block is emitted even without text, so the
    /// element boundary still reaches paragraph assembly.
    fn flush(&mut self, tag: &str, keep_empty: bool, blocks: &mut Vec<TextBlock>) {
        self.break_line();
        let lines: Vec<String> = self
            .lines
            .drain(..)
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        if keep_empty || !lines.is_empty() {
            blocks.push(TextBlock::new(tag, lines));
        }
    }
}

/// Parse XHTML into tagged text blocks in document order.
///
/// Text directly inside a wrapper is kept as a `p` block. Nested blocks
/// split their parent: text before and after the child is emitted as
/// separate blocks with the parent's tag. Closing and self-closing block
/// elements always yield a block, possibly without lines.
pub fn parse_xhtml<R: BufRead>(reader: R) -> Result<Vec<TextBlock>, IngestError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(4096);
    let mut blocks = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut builder = BlockBuilder::default();
    let mut skip_depth = 0usize;

    let current_tag = |open: &[String]| {
        open.last()
            .cloned()
            .unwrap_or_else(|| STRAY_TEXT_TAG.to_string())
    };

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = e.local_name();
                let name = name.as_ref();
                if skip_depth > 0 || is_one_of(SKIPPED_ELEMENTS, name) {
                    skip_depth += 1;
                } else if is_one_of(INLINE_ELEMENTS, name) {
                    // text keeps accumulating into the enclosing block
                } else if name.eq_ignore_ascii_case(b"br") {
                    builder.break_line();
                } else {
                    builder.flush(&current_tag(&open), false, &mut blocks);
                    if !is_one_of(WRAPPER_ELEMENTS, name) {
                        open.push(String::from_utf8_lossy(name).to_lowercase());
                    }
                }
            }

            Event::Empty(ref e) => {
                let name = e.local_name();
                let name = name.as_ref();
                if skip_depth > 0
                    || is_one_of(SKIPPED_ELEMENTS, name)
                    || is_one_of(INLINE_ELEMENTS, name)
                {
                    // nothing to emit
                } else if name.eq_ignore_ascii_case(b"br") {
                    builder.break_line();
                } else if !is_one_of(WRAPPER_ELEMENTS, name) {
                    builder.flush(&current_tag(&open), false, &mut blocks);
                    let tag = String::from_utf8_lossy(name).to_lowercase();
                    blocks.push(TextBlock::new(tag, Vec::new()));
                }
            }

            Event::Text(ref e) => {
                if skip_depth == 0 {
                    let raw = xml.decoder().decode(e.as_ref()).map_err(|source| {
                        RepairError::InputEncoding {
                            context: format!("<{}> block", current_tag(&open)),
                            source: Box::new(source),
                        }
                    })?;
                    let text =
                        unescape_with(&raw, resolve_html_entity).map_err(quick_xml::Error::from)?;
                    builder.push_text(&text);
                }
            }

            Event::CData(ref e) => {
                if skip_depth == 0 {
                    builder.push_text(&String::from_utf8_lossy(e.as_ref()));
                }
            }

            Event::End(ref e) => {
                let name = e.local_name();
                let name = name.as_ref();
                if skip_depth > 0 {
                    skip_depth -= 1;
                } else if is_one_of(INLINE_ELEMENTS, name) || name.eq_ignore_ascii_case(b"br") {
                    // no boundary
                } else {
                    let wrapper = is_one_of(WRAPPER_ELEMENTS, name);
                    builder.flush(&current_tag(&open), !wrapper, &mut blocks);
                    if !wrapper && open.pop().is_none() {
                        tracing::warn!(
                            tag = %String::from_utf8_lossy(name),
                            "closing tag without an open block"
                        );
                    }
                }
            }

            Event::Eof => {
                builder.flush(&current_tag(&open), false, &mut blocks);
                break;
            }

            _ => {}
        }
        buf.clear();
    }

    tracing::debug!(blocks = blocks.len(), "parsed primary markup");
    Ok(blocks)
}
