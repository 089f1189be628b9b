//! Greedy repair of words whose ligatures were dropped by the extractor.
//!
//! Some extractors decode a ligature glyph as one surviving letter or as
//! nothing at all, which leaves `E zienz` where the page showed `Effizienz`.
//! This pass runs over already-segmented words, left to right, and never
//! re-optimizes what it has already emitted.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::RepairError;
use crate::segmenter::Segmenter;
use crate::trace::{RepairEvent, Trace};
use crate::vocabulary::{Vocabulary, lowercase_first};

/// A lowercase letter directly followed by an uppercase one: two run-on words.
static CASE_SEAM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Ll}\p{Lu}").unwrap());

pub struct LigatureRepairer<'a> {
    /// Expansion strings, longest first.
    ligatures: &'a [String],
}

impl<'a> LigatureRepairer<'a> {
    pub fn new(ligatures: &'a [String]) -> Self {
        Self { ligatures }
    }

    pub fn repair(
        &self,
        words: Vec<String>,
        segmenter: &mut Segmenter<'_>,
        trace: &mut Trace,
    ) -> Result<Vec<String>, RepairError> {
        let words = self.resplit(words, segmenter, trace)?;
        let words = self.merge_pairs(words, segmenter.vocabulary(), trace);
        Ok(words
            .into_iter()
            .map(|word| self.affix(word, segmenter.vocabulary(), trace))
            .collect())
    }

    /// Re-split overlong and case-seamed words at character level.
    fn resplit(
        &self,
        words: Vec<String>,
        segmenter: &mut Segmenter<'_>,
        trace: &mut Trace,
    ) -> Result<Vec<String>, RepairError> {
        let max_len = segmenter.max_word_length();
        let mut out = Vec::with_capacity(words.len());
        for word in words {
            if word.chars().count() <= max_len && !CASE_SEAM.is_match(&word) {
                out.push(word);
                continue;
            }
            let seg = segmenter.segment_text(&word, true, trace)?;
            if seg.words.len() > 1 {
                trace.record(RepairEvent::Resplit {
                    from: word,
                    to: seg.words.clone(),
                });
                out.extend(seg.words);
            } else {
                out.push(word);
            }
        }
        Ok(out)
    }

    /// Merge adjacent pairs with at least one unknown member.
    fn merge_pairs(&self, words: Vec<String>, vocab: &Vocabulary, trace: &mut Trace) -> Vec<String> {
        let mut out = Vec::with_capacity(words.len());
        let mut i = 0;
        while i < words.len() {
            if i + 1 < words.len() {
                let (left, right) = (&words[i], &words[i + 1]);
                if (!vocab.contains_sentence_initial(left) || !vocab.contains_sentence_initial(right))
                    && let Some((ligature, word)) = self.bridge(left, right, vocab)
                {
                    trace.record(RepairEvent::LigatureMerged {
                        left: left.clone(),
                        right: right.clone(),
                        ligature,
                        word: word.clone(),
                    });
                    out.push(word);
                    i += 2;
                    continue;
                }
            }
            out.push(words[i].clone());
            i += 1;
        }
        out
    }

    /// First known join of `left` and `right`: direct, then through each ligature.
    fn bridge(&self, left: &str, right: &str, vocab: &Vocabulary) -> Option<(Option<String>, String)> {
        let direct = format!("{}{}", left, right);
        if vocab.contains_sentence_initial(&direct) {
            return Some((None, direct));
        }
        self.ligatures.iter().find_map(|ligature| {
            let joined = format!("{}{}{}", left, ligature, right);
            vocab
                .contains_sentence_initial(&joined)
                .then(|| (Some(ligature.clone()), joined))
        })
    }

    /// Prefix or suffix a ligature onto an unknown word.
    fn affix(&self, word: String, vocab: &Vocabulary, trace: &mut Trace) -> String {
        if word.chars().count() < 2 || vocab.contains_sentence_initial(&word) {
            return word;
        }
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);
        for ligature in self.ligatures {
            let prefixed = if capitalized {
                format!("{}{}", capitalize(ligature), lowercase_first(&word))
            } else {
                format!("{}{}", ligature, word)
            };
            let suffixed = format!("{}{}", word, ligature);
            for candidate in [prefixed, suffixed] {
                if vocab.contains_sentence_initial(&candidate) {
                    trace.record(RepairEvent::LigatureAffixed {
                        from: word,
                        to: candidate.clone(),
                    });
                    return candidate;
                }
            }
        }
        word
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
