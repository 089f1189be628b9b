//! One document's repair, from collected passes to paragraph-tagged words.

use unicode_normalization::UnicodeNormalization;

use crate::config::RepairConfig;
use crate::dehyphenate::{dehyphenate_lines, dehyphenate_word};
use crate::ligature::normalize_ligatures;
use crate::ligature_repair::LigatureRepairer;
use crate::model::LanguageModel;
use crate::paragraph::ParagraphAssembler;
use crate::segmenter::{Segmentation, Segmenter};
use crate::trace::{RepairEvent, Trace};
use crate::vocabulary::Vocabulary;
use crate::{DocumentItem, RepairError, TextBlock};

/// Output of [`DocumentRepairer::repair_blocks`].
#[derive(Debug, Clone)]
pub struct RepairedDocument {
    pub items: Vec<DocumentItem>,
    /// Side-channel decisions; empty unless `verbose_trace` is set.
    pub trace: Vec<RepairEvent>,
}

/// Owns the vocabulary, model and trace of one document conversion.
///
/// Collect passes (and optionally a lexicon) first, then repair blocks in
/// document order. Words merged in earlier blocks are known to later ones.
#[derive(Debug)]
pub struct DocumentRepairer {
    config: RepairConfig,
    vocabulary: Vocabulary,
    model: LanguageModel,
    trace: Trace,
    passes: usize,
}

impl DocumentRepairer {
    pub fn new(config: RepairConfig) -> Self {
        let vocabulary = Vocabulary::new(config.lowercase_fold());
        let model = vocabulary.build_model();
        let trace = Trace::new(config.verbose_trace());
        Self {
            config,
            vocabulary,
            model,
            trace,
            passes: 0,
        }
    }

    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn model(&self) -> &LanguageModel {
        &self.model
    }

    /// Number of extraction passes collected so far.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn add_lexicon<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.vocabulary
            .add_lexicon(entries.into_iter().map(|e| normalize(e.as_ref())));
        self.rebuild_model();
    }

    /// Count one extraction pass and rebuild the model.
    pub fn add_pass<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.vocabulary
            .add_pass_lines(lines.into_iter().map(|l| normalize(l.as_ref())));
        self.passes += 1;
        self.rebuild_model();
    }

    pub fn rebuild_model(&mut self) {
        self.model = self.vocabulary.build_model();
        tracing::debug!(
            passes = self.passes,
            words = self.model.len(),
            max_word_length = self.model.max_word_length(),
            "rebuilt language model"
        );
    }

    /// Repair the raw lines of one block into a word sequence.
    pub fn repair_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<Vec<String>, RepairError> {
        let lines: Vec<String> = lines.iter().map(|l| normalize(l.as_ref())).collect();
        if self.config.skip_merge {
            return Ok(lines
                .iter()
                .flat_map(|l| l.split_whitespace().map(str::to_string))
                .collect());
        }

        let force = self.config.force_character_split;
        let trace = &mut self.trace;
        let mut segmenter = Segmenter::new(&mut self.vocabulary, &mut self.model);

        let mut words = if self.config.skip_dehyphenation {
            let mut words = Vec::new();
            for line in lines.iter().filter(|l| !l.trim().is_empty()) {
                words.extend(segmenter.segment_text(line, force, trace)?.words);
            }
            words
        } else {
            dehyphenate_lines(&lines, &mut segmenter, force, trace)?
                .into_iter()
                .map(|word| match dehyphenate_word(&word, segmenter.vocabulary()) {
                    Some(to) => {
                        trace.record(RepairEvent::Dehyphenated {
                            from: word,
                            to: to.clone(),
                        });
                        to
                    }
                    None => word,
                })
                .collect()
        };

        if self.config.ligature_repair {
            words = LigatureRepairer::new(&self.config.repair_ligatures).repair(
                words,
                &mut segmenter,
                trace,
            )?;
        }
        Ok(words)
    }

    /// Repair every block in document order and assemble paragraphs.
    ///
    /// A [`RepairError::SegmentationInvariant`] aborts the whole document.
    pub fn repair_blocks(&mut self, blocks: &[TextBlock]) -> Result<RepairedDocument, RepairError> {
        let mut assembler = ParagraphAssembler::from_config(&self.config);
        for block in blocks {
            let words = self.repair_lines(&block.lines)?;
            tracing::trace!(tag = %block.tag, words = words.len(), "repaired block");
            assembler.push(&block.tag, words, &mut self.trace);
        }
        Ok(RepairedDocument {
            items: assembler.finish(),
            trace: self.trace.take(),
        })
    }

    /// Segment free text against the collected vocabulary.
    pub fn segment_text(&mut self, text: &str) -> Result<Segmentation, RepairError> {
        let text = normalize(text);
        let mut segmenter = Segmenter::new(&mut self.vocabulary, &mut self.model);
        segmenter.segment_text(&text, self.config.force_character_split, &mut self.trace)
    }

    /// Drain the trace collected outside [`repair_blocks`](Self::repair_blocks).
    pub fn take_trace(&mut self) -> Vec<RepairEvent> {
        self.trace.take()
    }
}

/// NFC, then ligature glyphs expanded to plain letters.
fn normalize(text: &str) -> String {
    normalize_ligatures(&text.nfc().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepairConfigBuilder;

    #[test]
    fn test_add_pass_rebuilds_model() {
        let mut repairer = DocumentRepairer::new(RepairConfig::default());
        assert!(repairer.model().is_empty());
        repairer.add_pass(["des matières combus-", "tibles et"]);
        assert_eq!(repairer.passes(), 1);
        assert!(repairer.model().contains("combustibles"));
    }

    #[test]
    fn test_pass_ligatures_are_expanded() {
        let mut repairer = DocumentRepairer::new(RepairConfig::default());
        repairer.add_pass(["\u{FB01}nding"]);
        assert!(repairer.vocabulary().contains("finding"));
    }

    #[test]
    fn test_pass_is_nfc_normalized() {
        let mut repairer = DocumentRepairer::new(RepairConfig::default());
        repairer.add_pass(["matie\u{0300}res"]);
        assert!(repairer.vocabulary().contains("matières"));
    }

    #[test]
    fn test_skip_merge_passes_tokens_through() {
        let config = RepairConfigBuilder::new().skip_merge(true).build().unwrap();
        let mut repairer = DocumentRepairer::new(config);
        repairer.add_pass(["rappel"]);
        let words = repairer.repair_lines(&["R A P P E L"]).unwrap();
        assert_eq!(words, vec!["R", "A", "P", "P", "E", "L"]);
    }

    #[test]
    fn test_standalone_dehyphenation() {
        let mut repairer = DocumentRepairer::new(
            RepairConfigBuilder::new().verbose_trace(true).build().unwrap(),
        );
        repairer.add_lexicon(["combustibles", "sont"]);
        let words = repairer.repair_lines(&["Combus-tibles sont"]).unwrap();
        assert_eq!(words, vec!["Combustibles", "sont"]);
    }

    #[test]
    fn test_skip_dehyphenation_segments_lines_apart() {
        let config = RepairConfigBuilder::new()
            .skip_dehyphenation(true)
            .build()
            .unwrap();
        let mut repairer = DocumentRepairer::new(config);
        repairer.add_lexicon(["combustibles", "et"]);
        let words = repairer.repair_lines(&["combus-", "tibles et"]).unwrap();
        assert_eq!(words, vec!["combus-", "tibles", "et"]);
    }

    #[test]
    fn test_ligature_repair_enabled() {
        let config = RepairConfigBuilder::new()
            .ligature_repair(true)
            .build()
            .unwrap();
        let mut repairer = DocumentRepairer::new(config);
        repairer.add_lexicon(["effizienz", "die"]);
        let words = repairer.repair_lines(&["die E zienz"]).unwrap();
        assert_eq!(words, vec!["die", "Effizienz"]);
    }

    #[test]
    fn test_segment_text() {
        let mut repairer = DocumentRepairer::new(RepairConfig::default());
        repairer.add_lexicon(["this", "is", "a", "test"]);
        let seg = repairer.segment_text("thisisatest").unwrap();
        assert_eq!(seg.words, vec!["this", "is", "a", "test"]);
    }
}
