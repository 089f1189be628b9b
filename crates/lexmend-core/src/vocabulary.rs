//! Document-local word counts gathered from extraction passes and lexicons.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::model::LanguageModel;

/// Multiset of word occurrences.
///
/// Every key present has a count of at least 1; absence means "unknown".
/// With `lowercase` set, all inserts and lookups fold to lower case.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    counts: HashMap<String, u64>,
    lowercase: bool,
}

impl Vocabulary {
    pub fn new(lowercase: bool) -> Self {
        Self {
            counts: HashMap::new(),
            lowercase,
        }
    }

    pub fn lowercase(&self) -> bool {
        self.lowercase
    }

    /// Apply the case-folding rule to `word`.
    pub fn fold<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if self.lowercase && word.chars().any(char::is_uppercase) {
            Cow::Owned(word.to_lowercase())
        } else {
            Cow::Borrowed(word)
        }
    }

    /// Count one occurrence of `word`. Empty words are ignored.
    pub fn add_word(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let key = self.fold(word).into_owned();
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// Count every token of one extraction pass.
    ///
    /// A token ending in a hyphen also registers its joined form with the
    /// following token, so `"combus-" "tibles"` adds `"combustibles"`.
    pub fn add_pass<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut previous: Option<String> = None;
        for token in tokens {
            let token = token.as_ref();
            if token.is_empty() {
                continue;
            }
            self.add_word(token);
            if let Some(prev) = previous.as_deref()
                && let Some(stem) = prev.strip_suffix('-')
                && !stem.is_empty()
            {
                self.add_word(&format!("{}{}", stem, token));
            }
            previous = Some(token.to_string());
        }
    }

    /// Whitespace-split `lines` into one token stream and count it.
    pub fn add_pass_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = lines
            .into_iter()
            .flat_map(|line| {
                line.as_ref()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        self.add_pass(tokens);
    }

    /// Count entries of an external word list.
    pub fn add_lexicon<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            self.add_word(entry.as_ref());
        }
    }

    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(self.fold(word).as_ref()).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(self.fold(word).as_ref())
    }

    /// Like [`contains`](Self::contains), but also accepts the word with only
    /// its first letter lowercased (`"Combustibles"` matches `"combustibles"`).
    pub fn contains_sentence_initial(&self, word: &str) -> bool {
        self.sentence_initial_key(word).is_some()
    }

    /// Key `word` is counted under, trying the sentence-initial form second.
    pub fn sentence_initial_key(&self, word: &str) -> Option<String> {
        let key = self.fold(word);
        if self.counts.contains_key(key.as_ref()) {
            return Some(key.into_owned());
        }
        let lowered = lowercase_first(word);
        let key = self.fold(&lowered);
        self.counts
            .contains_key(key.as_ref())
            .then(|| key.into_owned())
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total_count(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Length in characters of the longest word, never less than 1.
    pub fn longest_word_length(&self) -> usize {
        self.counts
            .keys()
            .map(|w| w.chars().count())
            .max()
            .unwrap_or(1)
            .max(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(w, c)| (w.as_str(), *c))
    }

    /// Snapshot the current counts into a [`LanguageModel`].
    pub fn build_model(&self) -> LanguageModel {
        LanguageModel::from_vocabulary(self)
    }
}

/// `word` with its first character lowercased.
pub(crate) fn lowercase_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_word_folds_case() {
        let mut vocab = Vocabulary::new(true);
        vocab.add_word("Rappel");
        vocab.add_word("RAPPEL");
        assert_eq!(vocab.count("rappel"), 2);
        assert!(vocab.contains("RaPpEl"));
        assert_eq!(vocab.len(), 1);
    }

    #[test]
    fn test_add_word_case_sensitive() {
        let mut vocab = Vocabulary::new(false);
        vocab.add_word("Rappel");
        assert!(vocab.contains("Rappel"));
        assert!(!vocab.contains("rappel"));
        assert!(vocab.contains_sentence_initial("Rappel"));
    }

    #[test]
    fn test_add_pass_registers_hyphen_joins() {
        let mut vocab = Vocabulary::new(true);
        vocab.add_pass(["les", "combus-", "tibles", "et"]);
        assert!(vocab.contains("combustibles"));
        assert!(vocab.contains("combus-"));
        assert!(vocab.contains("tibles"));
        assert_eq!(vocab.total_count(), 5);
    }

    #[test]
    fn test_add_pass_lines_spans_line_ends() {
        let mut vocab = Vocabulary::new(true);
        vocab.add_pass_lines(["des matières combus-", "tibles et"]);
        assert!(vocab.contains("combustibles"));
    }

    #[test]
    fn test_lone_hyphen_is_not_joined() {
        let mut vocab = Vocabulary::new(true);
        vocab.add_pass(["a", "-", "b"]);
        assert_eq!(vocab.count("b"), 1);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_sentence_initial_lookup() {
        let mut vocab = Vocabulary::new(false);
        vocab.add_word("combustibles");
        assert!(vocab.contains_sentence_initial("Combustibles"));
        assert!(!vocab.contains_sentence_initial("COMBUSTIBLES"));
        assert_eq!(
            vocab.sentence_initial_key("Combustibles").as_deref(),
            Some("combustibles")
        );
        assert_eq!(vocab.sentence_initial_key("Other"), None);
    }

    #[test]
    fn test_longest_word_length() {
        let mut vocab = Vocabulary::new(true);
        assert_eq!(vocab.longest_word_length(), 1);
        vocab.add_lexicon(["é", "présentation", "et"]);
        assert_eq!(vocab.longest_word_length(), 12);
    }
}
