//! Rejoining words broken by line-wrap hyphens.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::RepairError;
use crate::segmenter::{Segmenter, TokenStream};
use crate::trace::{RepairEvent, Trace};
use crate::vocabulary::Vocabulary;

static INTERIOR_HYPHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\s-]-+[^\s-]").unwrap());

/// Remove every hyphen flanked on both sides by a non-hyphen character.
///
/// Returns `None` when there is no such hyphen.
///
/// - `"combus-tibles"` → `Some("combustibles")`
/// - `"combus-"` → `None`
/// - `"a--b"` → `None`
pub fn strip_interior_hyphens(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut stripped = false;
    for (i, &c) in chars.iter().enumerate() {
        let interior = c == '-'
            && i > 0
            && i + 1 < chars.len()
            && chars[i - 1] != '-'
            && chars[i + 1] != '-';
        if interior {
            stripped = true;
        } else {
            out.push(c);
        }
    }
    stripped.then_some(out)
}

/// Dehyphenated form of one segmented word, if the vocabulary knows it.
///
/// All hyphens are stripped; the lookup tolerates a capitalized first letter.
pub fn dehyphenate_word(word: &str, vocabulary: &Vocabulary) -> Option<String> {
    if !INTERIOR_HYPHEN.is_match(word) {
        return None;
    }
    let stripped = word.replace('-', "");
    vocabulary
        .contains_sentence_initial(&stripped)
        .then_some(stripped)
}

/// Segment the lines of one block, joining hyphen-broken line ends.
///
/// Every line is tokenized at its own granularity. For a line ending in
/// `-` the hyphen-kept stream (both lines back to back) and the
/// dehyphenated stream (the stem's last token fused with the next line's
/// first) are both trial-segmented; the dehyphenated one wins only with
/// strictly fewer words. Chained wraps keep consuming lines while the
/// stream still ends in a hyphen.
pub fn dehyphenate_lines<S: AsRef<str>>(
    lines: &[S],
    segmenter: &mut Segmenter<'_>,
    force_character: bool,
    trace: &mut Trace,
) -> Result<Vec<String>, RepairError> {
    let mut words = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        let mut stream = TokenStream::from_line(lines[idx].as_ref(), force_character);
        while idx + 1 < lines.len() {
            let Some(stem) = wrap_stem(&stream) else {
                break;
            };
            let line = lines[idx].as_ref().trim().to_string();
            let next = lines[idx + 1].as_ref();
            let next_stream = TokenStream::from_line(next, force_character);

            let mut kept = stream;
            kept.extend(next_stream.clone());
            let mut joined = stem;
            joined.extend_glued(next_stream);

            let kept_len = segmenter.trial_stream(&kept)?.words.len();
            let joined_len = segmenter.trial_stream(&joined)?.words.len();
            let next = next.trim().to_string();
            if joined_len < kept_len {
                trace.record(RepairEvent::HyphenJoined { line, next });
                stream = joined;
            } else {
                trace.record(RepairEvent::HyphenKept { line, next });
                stream = kept;
            }
            idx += 1;
        }
        if !stream.is_empty() {
            words.extend(segmenter.segment_stream(&stream, trace)?.words);
        }
        idx += 1;
    }
    Ok(words)
}

/// `stream` without its wrap hyphen, when it ends in one.
///
/// A dash standing alone between words is punctuation, not a wrap.
fn wrap_stem(stream: &TokenStream) -> Option<TokenStream> {
    let last = stream.tokens.last()?;
    let mut stem = stream.clone();
    if last == "-" {
        let at_character_level = stream.characters.last().copied().unwrap_or(false);
        let previous = stream.tokens.len().checked_sub(2).map(|i| &stream.tokens[i])?;
        if !at_character_level || previous.ends_with('-') {
            return None;
        }
        stem.tokens.pop();
        stem.characters.pop();
    } else {
        let trimmed = last.strip_suffix('-')?;
        if trimmed.ends_with('-') {
            return None;
        }
        if let Some(token) = stem.tokens.last_mut() {
            *token = trimmed.to_string();
        }
    }
    Some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab_of(words: &[(&str, usize)]) -> Vocabulary {
        let mut vocab = Vocabulary::new(true);
        for (word, count) in words {
            for _ in 0..*count {
                vocab.add_word(word);
            }
        }
        vocab
    }

    #[test]
    fn test_strip_interior_hyphens() {
        assert_eq!(strip_interior_hyphens("combus-tibles").as_deref(), Some("combustibles"));
        assert_eq!(strip_interior_hyphens("a-b-c").as_deref(), Some("abc"));
        assert_eq!(strip_interior_hyphens("combus-"), None);
        assert_eq!(strip_interior_hyphens("-prefix"), None);
        assert_eq!(strip_interior_hyphens("a--b"), None);
    }

    #[test]
    fn test_dehyphenate_word_known() {
        let vocab = vocab_of(&[("combustibles", 1)]);
        assert_eq!(
            dehyphenate_word("combus-tibles", &vocab).as_deref(),
            Some("combustibles")
        );
        assert_eq!(dehyphenate_word("well-known", &vocab), None);
        assert_eq!(dehyphenate_word("plain", &vocab), None);
    }

    #[test]
    fn test_dehyphenate_word_sentence_initial() {
        let mut vocab = Vocabulary::new(false);
        vocab.add_word("combustibles");
        assert_eq!(
            dehyphenate_word("Combus-tibles", &vocab).as_deref(),
            Some("Combustibles")
        );
    }

    #[test]
    fn test_line_break_dehyphenated() {
        let mut vocab = vocab_of(&[("combustibles", 2), ("et", 5), ("les", 3)]);
        let mut model = vocab.build_model();
        let mut segmenter = Segmenter::new(&mut vocab, &mut model);
        let words = dehyphenate_lines(
            &["combus-", "tibles et"],
            &mut segmenter,
            false,
            &mut Trace::disabled(),
        )
        .unwrap();
        assert_eq!(words, vec!["combustibles", "et"]);
    }

    #[test]
    fn test_unknown_join_still_wins_with_fewer_words() {
        let mut vocab = vocab_of(&[("et", 5)]);
        let mut model = vocab.build_model();
        let mut segmenter = Segmenter::new(&mut vocab, &mut model);
        let mut trace = Trace::new(true);
        let words =
            dehyphenate_lines(&["matières inflam-", "mables et"], &mut segmenter, false, &mut trace)
                .unwrap();
        assert_eq!(words, vec!["matières", "inflammables", "et"]);
        assert!(matches!(trace.events()[0], RepairEvent::HyphenJoined { .. }));
    }

    #[test]
    fn test_known_compound_keeps_hyphen() {
        let mut vocab = vocab_of(&[("well-known", 2), ("facts", 2)]);
        let mut model = vocab.build_model();
        let mut segmenter = Segmenter::new(&mut vocab, &mut model);
        let mut trace = Trace::new(true);
        let words = dehyphenate_lines(&["some well-", "known facts"], &mut segmenter, false, &mut trace)
            .unwrap();
        assert_eq!(words, vec!["some", "well-known", "facts"]);
        assert!(matches!(trace.events()[0], RepairEvent::HyphenKept { .. }));
    }

    #[test]
    fn test_chained_wraps() {
        let mut vocab = vocab_of(&[("extraordinairement", 1), ("long", 3)]);
        let mut model = vocab.build_model();
        let mut segmenter = Segmenter::new(&mut vocab, &mut model);
        let words = dehyphenate_lines(
            &["un mot extra-", "ordinaire-", "ment long"],
            &mut segmenter,
            false,
            &mut Trace::disabled(),
        )
        .unwrap();
        assert_eq!(words, vec!["un", "mot", "extraordinairement", "long"]);
    }

    #[test]
    fn test_lines_without_hyphen_segment_independently() {
        let mut vocab = vocab_of(&[("first", 1), ("line", 2), ("second", 1)]);
        let mut model = vocab.build_model();
        let mut segmenter = Segmenter::new(&mut vocab, &mut model);
        let words = dehyphenate_lines(
            &["first line", "second line", "   "],
            &mut segmenter,
            false,
            &mut Trace::disabled(),
        )
        .unwrap();
        assert_eq!(words, vec!["first", "line", "second", "line"]);
    }

    #[test]
    fn test_trailing_dash_is_not_a_wrap() {
        let stem = |line: &str| wrap_stem(&TokenStream::from_line(line, false)).map(|s| s.tokens);
        assert_eq!(stem("pause -"), None);
        assert_eq!(stem("--"), None);
        assert_eq!(stem("des combus-"), Some(vec!["des".to_string(), "combus".to_string()]));
        assert_eq!(stem("combus-").map(|t| t.concat()).as_deref(), Some("combus"));
    }

    #[test]
    fn test_run_on_lines_split_across_wrap() {
        let mut vocab = Vocabulary::new(true);
        vocab.add_pass_lines(["rappel de la combustibles et des"]);
        let mut model = vocab.build_model();
        let mut segmenter = Segmenter::new(&mut vocab, &mut model);
        let mut trace = Trace::new(true);
        let words = dehyphenate_lines(
            &["Rappeldelacombus-", "tiblesetdes"],
            &mut segmenter,
            false,
            &mut trace,
        )
        .unwrap();
        assert_eq!(words, vec!["Rappel", "de", "la", "combustibles", "et", "des"]);
        assert!(matches!(trace.events()[0], RepairEvent::HyphenJoined { .. }));
    }

    #[test]
    fn test_word_line_wrapping_into_run_on_line() {
        let mut vocab = Vocabulary::new(true);
        vocab.add_pass_lines(["des matières combustibles et"]);
        let mut model = vocab.build_model();
        let mut segmenter = Segmenter::new(&mut vocab, &mut model);
        let words = dehyphenate_lines(
            &["des matières combus-", "tiblesetdes"],
            &mut segmenter,
            false,
            &mut Trace::disabled(),
        )
        .unwrap();
        assert_eq!(words, vec!["des", "matières", "combustibles", "et", "des"]);
    }
}
