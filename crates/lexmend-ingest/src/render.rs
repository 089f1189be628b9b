//! Serializers for repaired documents.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use lexmend_core::DocumentItem;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::IngestError;

const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Xhtml,
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xhtml" | "html" => Ok(OutputFormat::Xhtml),
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown output format '{}' (expected xhtml, text or json)",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Xhtml => "xhtml",
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        })
    }
}

/// Write `items` to `out` in the given format.
pub fn render<W: Write>(format: OutputFormat, items: &[DocumentItem], out: W) -> Result<(), IngestError> {
    match format {
        OutputFormat::Xhtml => render_xhtml(items, out),
        OutputFormat::Text => render_text(items, out),
        OutputFormat::Json => render_json(items, out),
    }
}

/// Write a complete XHTML document, one element per block.
///
/// Words of a block are joined with single spaces.
pub fn render_xhtml<W: Write>(items: &[DocumentItem], out: W) -> Result<(), IngestError> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("html").with_attributes([("xmlns", XHTML_NAMESPACE)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("body")))?;
    for item in items {
        match item {
            DocumentItem::Open { tag } => {
                writer.write_event(Event::Start(BytesStart::new(tag.as_str())))?;
            }
            DocumentItem::Words { words } => {
                writer.write_event(Event::Text(BytesText::new(&words.join(" "))))?;
            }
            DocumentItem::Close { tag } => {
                writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("html")))?;
    writeln!(writer.get_mut())?;
    Ok(())
}

/// One line per block, blocks separated by a blank line.
pub fn render_text<W: Write>(items: &[DocumentItem], mut out: W) -> Result<(), IngestError> {
    let mut first = true;
    for item in items {
        if let DocumentItem::Words { words } = item {
            if !first {
                writeln!(out)?;
            }
            writeln!(out, "{}", words.join(" "))?;
            first = false;
        }
    }
    Ok(())
}

/// The item stream as a pretty-printed JSON array.
pub fn render_json<W: Write>(items: &[DocumentItem], mut out: W) -> Result<(), IngestError> {
    serde_json::to_writer_pretty(&mut out, items)?;
    writeln!(out)?;
    Ok(())
}
