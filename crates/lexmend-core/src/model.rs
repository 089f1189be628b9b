//! Unigram language model snapshot with additive smoothing.

use std::collections::HashMap;

use crate::vocabulary::Vocabulary;

/// Additive smoothing constant.
pub const SMOOTHING: f64 = 0.1;

/// Log-probabilities derived from one [`Vocabulary`] snapshot.
///
/// With `total = ε + Σ counts`:
/// - `prob(w) = ln(count(w)) − ln(total + ε)`
/// - `unknown = ln(ε) − ln(total)`
#[derive(Debug, Clone)]
pub struct LanguageModel {
    logprobs: HashMap<String, f64>,
    unknown: f64,
    /// `ln(total + ε)`, kept so learned words share the snapshot's scale.
    log_denominator: f64,
    max_word_length: usize,
}

impl LanguageModel {
    /// Reserved key naming the unknown-word backoff in dumps and traces.
    pub const UNKNOWN_KEY: &'static str = "__unknown__";

    pub fn from_vocabulary(vocabulary: &Vocabulary) -> Self {
        let total = SMOOTHING + vocabulary.total_count() as f64;
        let log_denominator = (total + SMOOTHING).ln();
        let logprobs = vocabulary
            .iter()
            .map(|(word, count)| (word.to_string(), (count as f64).ln() - log_denominator))
            .collect();
        Self {
            logprobs,
            unknown: SMOOTHING.ln() - total.ln(),
            log_denominator,
            max_word_length: vocabulary.longest_word_length(),
        }
    }

    /// Log-probability of an already case-folded word, if known.
    pub fn logprob(&self, word: &str) -> Option<f64> {
        if word == Self::UNKNOWN_KEY {
            return Some(self.unknown);
        }
        self.logprobs.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.logprobs.contains_key(word)
    }

    /// Backoff charged to a single out-of-vocabulary token.
    pub fn unknown(&self) -> f64 {
        self.unknown
    }

    /// Search-width bound in characters, at least 1.
    pub fn max_word_length(&self) -> usize {
        self.max_word_length
    }

    /// Number of known words.
    pub fn len(&self) -> usize {
        self.logprobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logprobs.is_empty()
    }

    /// Make a self-reinforced word visible to later searches.
    ///
    /// `count` is the word's live vocabulary count; the score uses the
    /// snapshot's denominator.
    pub fn learn(&mut self, word: &str, count: u64) {
        if word.is_empty() || count == 0 {
            return;
        }
        let logprob = (count as f64).ln() - self.log_denominator;
        self.logprobs.insert(word.to_string(), logprob);
        self.max_word_length = self.max_word_length.max(word.chars().count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_probabilities_follow_smoothing_formula() {
        let mut vocab = Vocabulary::new(true);
        vocab.add_lexicon(["rappel"; 5]);
        vocab.add_lexicon(["presentation"; 3]);
        let model = vocab.build_model();

        let total = SMOOTHING + 8.0;
        assert!(close(
            model.logprob("rappel").unwrap(),
            5f64.ln() - (total + SMOOTHING).ln()
        ));
        assert!(close(model.unknown(), SMOOTHING.ln() - total.ln()));
        assert!(close(
            model.logprob(LanguageModel::UNKNOWN_KEY).unwrap(),
            model.unknown()
        ));
        assert_eq!(model.max_word_length(), 12);
    }

    #[test]
    fn test_empty_vocabulary_yields_valid_model() {
        let model = Vocabulary::new(true).build_model();
        assert!(model.is_empty());
        assert!(model.unknown().is_finite());
        assert_eq!(model.max_word_length(), 1);
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut vocab = Vocabulary::new(true);
        vocab.add_lexicon(["a", "b", "b"]);
        let first = vocab.build_model();
        let second = vocab.build_model();
        assert_eq!(first.len(), second.len());
        assert!(close(first.logprob("b").unwrap(), second.logprob("b").unwrap()));
        assert!(close(first.unknown(), second.unknown()));
    }

    #[test]
    fn test_learn_uses_snapshot_denominator() {
        let mut vocab = Vocabulary::new(true);
        vocab.add_lexicon(["a", "b"]);
        let mut model = vocab.build_model();
        model.learn("ab", 1);
        assert!(close(model.logprob("ab").unwrap(), model.logprob("a").unwrap()));
    }
}
