//! External word lists, plain or gzip-compressed.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use lexmend_core::RepairError;

use crate::IngestError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Load the whitespace-delimited words of a lexicon file.
///
/// The file is gunzipped when it has a `.gz` extension or starts with the
/// gzip magic bytes. Any read, decompression or decoding failure is a
/// [`RepairError::VocabularyLoad`].
pub fn load_lexicon(path: &Path) -> Result<Vec<String>, IngestError> {
    let load_error = |source: io::Error| RepairError::VocabularyLoad {
        path: path.to_path_buf(),
        source,
    };

    let bytes = fs::read(path).map_err(load_error)?;
    let gzipped = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("gz"))
        || bytes.starts_with(&GZIP_MAGIC);

    let text = if gzipped {
        let mut text = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut text)
            .map_err(load_error)?;
        text
    } else {
        String::from_utf8(bytes)
            .map_err(|e| load_error(io::Error::new(io::ErrorKind::InvalidData, e)))?
    };

    let words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
    tracing::debug!(path = %path.display(), gzipped, words = words.len(), "loaded lexicon");
    Ok(words)
}
