//! Maximum-likelihood word segmentation.
//!
//! A bounded-window Viterbi search over cut points `0..=N` of a token
//! sequence. Every span of up to `max_word_length` tokens whose concatenation
//! is a known word is a candidate; a single token is always admissible and is
//! charged the unknown-word backoff when the model does not know it.

use std::borrow::Cow;

use crate::RepairError;
use crate::dehyphenate::strip_interior_hyphens;
use crate::model::LanguageModel;
use crate::trace::{RepairEvent, Trace};
use crate::vocabulary::Vocabulary;

/// How a line of text is cut into atomic tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Whitespace-separated words.
    Word,
    /// Individual non-whitespace characters.
    Character,
}

impl Granularity {
    /// Character level when forced, or when `text` has no internal whitespace
    /// (the extractor lost every word boundary on that line).
    pub fn detect(text: &str, force_character: bool) -> Self {
        if force_character || !text.trim().contains(char::is_whitespace) {
            Granularity::Character
        } else {
            Granularity::Word
        }
    }

    pub fn tokenize(self, text: &str) -> Vec<String> {
        match self {
            Granularity::Word => text.split_whitespace().map(str::to_string).collect(),
            Granularity::Character => text
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(String::from)
                .collect(),
        }
    }
}

/// Tokens of one or more lines, each line cut at its own granularity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    pub(crate) tokens: Vec<String>,
    /// Parallel to `tokens`: cut from a line at character level.
    pub(crate) characters: Vec<bool>,
}

impl TokenStream {
    pub fn from_line(text: &str, force_character: bool) -> Self {
        let granularity = Granularity::detect(text, force_character);
        let tokens = granularity.tokenize(text);
        let characters = vec![granularity == Granularity::Character; tokens.len()];
        Self { tokens, characters }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Append `other` after the last token.
    pub fn extend(&mut self, other: TokenStream) {
        self.tokens.extend(other.tokens);
        self.characters.extend(other.characters);
    }

    /// Append `other`, fusing its first token onto the last token here.
    pub fn extend_glued(&mut self, other: TokenStream) {
        let mut rest = other.tokens.into_iter().zip(other.characters);
        if let Some(last) = self.tokens.last_mut()
            && let Some((first, _)) = rest.next()
        {
            last.push_str(&first);
            if let Some(character) = self.characters.last_mut() {
                *character = false;
            }
        }
        for (token, character) in rest {
            self.tokens.push(token);
            self.characters.push(character);
        }
    }
}

/// Counters describing one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidate spans looked up in the model.
    pub candidates: usize,
    /// Character length of the longest candidate looked up.
    pub longest_candidate: usize,
}

/// Result of one segmentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    pub words: Vec<String>,
    /// Cumulative log-likelihood of the chosen path.
    pub score: f64,
    pub stats: SearchStats,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    score: f64,
    prev: usize,
}

/// Segments token streams against a live vocabulary and its model.
///
/// Winning spans that merge several tokens are fed back into both, so later
/// blocks of the same document recognise them directly.
pub struct Segmenter<'a> {
    vocabulary: &'a mut Vocabulary,
    model: &'a mut LanguageModel,
}

impl<'a> Segmenter<'a> {
    pub fn new(vocabulary: &'a mut Vocabulary, model: &'a mut LanguageModel) -> Self {
        Self { vocabulary, model }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.vocabulary
    }

    pub fn model(&self) -> &LanguageModel {
        self.model
    }

    pub fn max_word_length(&self) -> usize {
        self.model.max_word_length().max(1)
    }

    /// Segment without touching the vocabulary.
    pub fn trial<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Segmentation, RepairError> {
        let (spans, score, stats) = self.search(tokens)?;
        let words = spans
            .iter()
            .map(|&(start, end)| self.span_word(&tokens[start..end]))
            .collect();
        Ok(Segmentation {
            words,
            score,
            stats,
        })
    }

    /// Segment and reinforce every multi-token word on the winning path.
    pub fn segment<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        trace: &mut Trace,
    ) -> Result<Segmentation, RepairError> {
        let (spans, score, stats) = self.search(tokens)?;
        let words = self.commit(tokens, &spans, trace);
        Ok(Segmentation {
            words,
            score,
            stats,
        })
    }

    /// [`trial`](Self::trial) over a mixed-granularity stream.
    pub fn trial_stream(&self, stream: &TokenStream) -> Result<Segmentation, RepairError> {
        self.trial(&stream.tokens)
    }

    /// [`segment`](Self::segment) a mixed-granularity stream.
    ///
    /// Runs of unknown single characters cut at character level are
    /// rejoined, so an unknown word is not spelled out letter by letter.
    pub fn segment_stream(
        &mut self,
        stream: &TokenStream,
        trace: &mut Trace,
    ) -> Result<Segmentation, RepairError> {
        let (spans, score, stats) = self.search(&stream.tokens)?;
        let words = self.commit(&stream.tokens, &spans, trace);
        Ok(Segmentation {
            words: self.rejoin_unknown(words, &spans, stream),
            score,
            stats,
        })
    }

    /// Tokenize one line at its detected granularity and
    /// [`segment_stream`](Self::segment_stream) it.
    pub fn segment_text(
        &mut self,
        text: &str,
        force_character: bool,
        trace: &mut Trace,
    ) -> Result<Segmentation, RepairError> {
        self.segment_stream(&TokenStream::from_line(text, force_character), trace)
    }

    /// Like [`segment_text`](Self::segment_text) without learning.
    pub fn trial_text(
        &self,
        text: &str,
        force_character: bool,
    ) -> Result<Segmentation, RepairError> {
        let stream = TokenStream::from_line(text, force_character);
        let (spans, score, stats) = self.search(&stream.tokens)?;
        let words = spans
            .iter()
            .map(|&(start, end)| self.span_word(&stream.tokens[start..end]))
            .collect();
        Ok(Segmentation {
            words: self.rejoin_unknown(words, &spans, &stream),
            score,
            stats,
        })
    }

    fn commit<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        spans: &[(usize, usize)],
        trace: &mut Trace,
    ) -> Vec<String> {
        let mut words = Vec::with_capacity(spans.len());
        for &(start, end) in spans {
            let parts = &tokens[start..end];
            let word = self.span_word(parts);
            if parts.len() > 1 {
                self.reinforce(&word);
                trace.record(RepairEvent::Merged {
                    parts: parts.iter().map(|p| p.as_ref().to_string()).collect(),
                    word: word.clone(),
                });
            }
            words.push(word);
        }
        words
    }

    fn rejoin_unknown(
        &self,
        words: Vec<String>,
        spans: &[(usize, usize)],
        stream: &TokenStream,
    ) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(words.len());
        let mut in_run = false;
        for (word, &(start, end)) in words.into_iter().zip(spans) {
            let stray = end == start + 1
                && stream.characters[start]
                && !self.model.contains(&self.vocabulary.fold(&word));
            if stray && in_run && let Some(last) = out.last_mut() {
                last.push_str(&word);
            } else {
                out.push(word);
            }
            in_run = stray;
        }
        out
    }

    fn reinforce(&mut self, word: &str) {
        self.vocabulary.add_word(word);
        let key = self.vocabulary.fold(word).into_owned();
        let count = self.vocabulary.count(&key);
        self.model.learn(&key, count);
    }

    /// Concatenation of `parts` with interior hyphens repaired.
    fn span_word<S: AsRef<str>>(&self, parts: &[S]) -> String {
        let joined: String = parts.iter().map(|p| p.as_ref()).collect();
        match self.repair_hyphen(&joined) {
            Some((word, _)) => word,
            None => joined,
        }
    }

    /// The span with interior hyphens dropped, and the key it is counted
    /// under, when the dehyphenated form is a known word.
    fn repair_hyphen(&self, span: &str) -> Option<(String, String)> {
        let stripped = strip_interior_hyphens(span)?;
        let key = self.vocabulary.sentence_initial_key(&stripped)?;
        Some((stripped, key))
    }

    /// Forward pass plus backtrack. Returns the winning spans as
    /// `(start, end)` token ranges in left-to-right order.
    fn search<S: AsRef<str>>(
        &self,
        tokens: &[S],
    ) -> Result<(Vec<(usize, usize)>, f64, SearchStats), RepairError> {
        let n = tokens.len();
        let mut stats = SearchStats::default();
        if n == 0 {
            return Ok((Vec::new(), 0.0, stats));
        }

        let max_len = self.max_word_length();
        let unknown = self.model.unknown();
        let mut best: Vec<Option<Cell>> = vec![None; n + 1];
        best[0] = Some(Cell {
            score: 0.0,
            prev: 0,
        });

        for i in 0..n {
            let Some(base) = best[i].map(|c| c.score) else {
                continue;
            };
            let mut span = String::new();
            // Hyphens may vanish in repair, so only letters bound the window.
            let mut span_letters = 0;
            for j in (i + 1)..=n.min(i + max_len) {
                let token = tokens[j - 1].as_ref();
                span.push_str(token);
                span_letters += token.chars().filter(|&c| c != '-').count();
                let single = j == i + 1;

                let logprob = if span_letters > max_len {
                    if !single {
                        break;
                    }
                    // Longer than any known word: opaque unknown token.
                    unknown
                } else {
                    let (candidate, key) = match self.repair_hyphen(&span) {
                        Some((word, key)) => (Cow::Owned(word), Cow::Owned(key)),
                        None => (Cow::Borrowed(span.as_str()), self.vocabulary.fold(&span)),
                    };
                    let candidate_len = candidate.chars().count();
                    if candidate_len > max_len {
                        if !single {
                            continue;
                        }
                        unknown
                    } else {
                        stats.candidates += 1;
                        stats.longest_candidate = stats.longest_candidate.max(candidate_len);
                        match self.model.logprob(&key) {
                            Some(lp) => lp,
                            None if single => unknown,
                            None => continue,
                        }
                    }
                };

                let score = base + logprob;
                // Strictly greater: the first writer keeps ties.
                if best[j].is_none_or(|c| score > c.score) {
                    best[j] = Some(Cell { score, prev: i });
                }
            }
        }

        let reached = best.iter().rposition(Option::is_some).unwrap_or(0);
        let Some(end) = best[n] else {
            return Err(RepairError::SegmentationInvariant { tokens: n, reached });
        };

        let mut spans = Vec::new();
        let mut j = n;
        while j > 0 {
            let Some(cell) = best[j] else {
                return Err(RepairError::SegmentationInvariant { tokens: n, reached });
            };
            spans.push((cell.prev, j));
            j = cell.prev;
        }
        spans.reverse();
        Ok((spans, end.score, stats))
    }
}
