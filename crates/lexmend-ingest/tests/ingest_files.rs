//! File-based tests for lexicons, passes and primary documents.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use lexmend_core::{DocumentRepairer, RepairConfig, RepairError};
use lexmend_ingest::{
    IngestError, OutputFormat, load_lexicon, read_pass, read_primary, render,
};

fn write_gz(path: &Path, text: &str) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    fs::write(path, encoder.finish().unwrap()).unwrap();
}

#[test]
fn plain_lexicon_loads_words() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.txt");
    fs::write(&path, "rappel présentation\ncombustibles\n\n  et\n").unwrap();

    let words = load_lexicon(&path).unwrap();
    assert_eq!(words, vec!["rappel", "présentation", "combustibles", "et"]);
}

#[test]
fn gzip_lexicon_detected_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.txt.gz");
    write_gz(&path, "alpha beta\ngamma\n");

    assert_eq!(load_lexicon(&path).unwrap(), vec!["alpha", "beta", "gamma"]);
}

#[test]
fn gzip_lexicon_detected_by_magic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.dat");
    write_gz(&path, "delta\n");

    assert_eq!(load_lexicon(&path).unwrap(), vec!["delta"]);
}

#[test]
fn missing_lexicon_is_a_vocabulary_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");

    let err = load_lexicon(&path).unwrap_err();
    assert!(matches!(
        err,
        IngestError::Repair(RepairError::VocabularyLoad { .. })
    ));
    assert!(err.to_string().contains("absent.txt"));
}

#[test]
fn corrupt_gzip_is_a_vocabulary_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.gz");
    fs::write(&path, [0x1f, 0x8b, 0x08, 0x00, 0xde, 0xad]).unwrap();

    let err = load_lexicon(&path).unwrap_err();
    assert!(matches!(
        err,
        IngestError::Repair(RepairError::VocabularyLoad { .. })
    ));
}

#[test]
fn non_utf8_pass_is_an_encoding_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pass.txt");
    fs::write(&path, [b'o', b'k', b'\n', 0xff, 0xfe]).unwrap();

    let err = read_pass(&path).unwrap_err();
    assert!(matches!(
        err,
        IngestError::Repair(RepairError::InputEncoding { .. })
    ));
}

#[test]
fn pass_page_breaks_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pass.txt");
    fs::write(&path, "page one\n\u{c}page two\n").unwrap();

    assert_eq!(read_pass(&path).unwrap(), vec!["page one", "page two"]);
}

#[test]
fn plain_text_primary_splits_on_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("primary.txt");
    fs::write(&path, "first block\ncontinued\n\nsecond block\n").unwrap();

    let blocks = read_primary(&path).unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].lines, vec!["first block", "continued"]);
}

#[test]
fn xhtml_primary_repaired_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let pass = dir.path().join("pass.txt");
    let primary = dir.path().join("primary.xhtml");
    fs::write(
        &pass,
        "Rappel de la présentation\ndes matières combus-\ntibles et des liquides.\n",
    )
    .unwrap();
    fs::write(
        &primary,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml"><body>
<h1>R A P P E L</h1>
<p>des matières combus-
tibles et des</p>
<p>liquides.</p>
</body></html>"#,
    )
    .unwrap();

    let mut repairer = DocumentRepairer::new(RepairConfig::default());
    repairer.add_pass(read_pass(&pass).unwrap());
    let doc = repairer.repair_blocks(&read_primary(&primary).unwrap()).unwrap();

    let mut out = Vec::new();
    render(OutputFormat::Text, &doc.items, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "RAPPEL\n\ndes matières combustibles et des liquides.\n"
    );
}

#[test]
fn invalid_utf8_in_xhtml_block_is_an_encoding_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("primary.xhtml");
    let mut bytes = b"<html><body><p>ok ".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe]);
    bytes.extend_from_slice(b" bad</p></body></html>");
    fs::write(&path, bytes).unwrap();

    let err = read_primary(&path).unwrap_err();
    assert!(matches!(
        err,
        IngestError::Repair(RepairError::InputEncoding { .. })
    ));
    assert!(err.to_string().contains("<p> block"));
}
