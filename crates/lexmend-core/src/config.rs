use thiserror::Error;

use crate::ligature::repair_strings;

/// Controls how a list of values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    #[default]
    Default,
    /// Drop the built-in values.
    Replace(Vec<T>),
    /// Keep the built-in values and add these.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    pub fn resolve(&self, builtin: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => builtin.to_vec(),
            ListOverride::Replace(values) => values.clone(),
            ListOverride::Extend(extra) => builtin.iter().chain(extra).cloned().collect(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("forcing character split while skipping merge would emit one letter per word")]
    CharacterSplitWithoutMerge,
    #[error("at least one paragraph tag is required")]
    NoParagraphTags,
    #[error("repair ligature strings must not be blank")]
    BlankLigature,
}

/// Tag names treated as paragraphs when no override is given.
pub const DEFAULT_PARAGRAPH_TAGS: &[&str] = &["p"];

/// Behavioural flags for one document repair.
///
/// Use [`RepairConfigBuilder`] to construct a validated config.
#[derive(Debug, Clone)]
pub struct RepairConfig {
    /// Fold case on every vocabulary insert and lookup.
    pub(crate) lowercase_fold: bool,
    /// Pass tokens through without segmentation or ligature repair.
    pub(crate) skip_merge: bool,
    /// Skip line joining and standalone dehyphenation.
    pub(crate) skip_dehyphenation: bool,
    /// Segment every line at character level.
    pub(crate) force_character_split: bool,
    /// Merge adjacent paragraph blocks using surface cues.
    pub(crate) auto_merge_paragraphs: bool,
    /// Close paragraphs only at non-paragraph tags.
    pub(crate) never_split_paragraphs: bool,
    /// Keep repair decisions in the side-channel trace.
    pub(crate) verbose_trace: bool,
    /// The primary extraction drops ligatures; run the ligature repairer.
    pub(crate) ligature_repair: bool,
    /// Resolved paragraph tag names.
    pub(crate) paragraph_tags: Vec<String>,
    /// Resolved ligature strings, longest first.
    pub(crate) repair_ligatures: Vec<String>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            lowercase_fold: true,
            skip_merge: false,
            skip_dehyphenation: false,
            force_character_split: false,
            auto_merge_paragraphs: true,
            never_split_paragraphs: false,
            verbose_trace: false,
            ligature_repair: false,
            paragraph_tags: DEFAULT_PARAGRAPH_TAGS.iter().map(|t| t.to_string()).collect(),
            repair_ligatures: repair_strings(),
        }
    }
}

impl RepairConfig {
    pub fn lowercase_fold(&self) -> bool {
        self.lowercase_fold
    }

    pub fn skip_merge(&self) -> bool {
        self.skip_merge
    }

    pub fn skip_dehyphenation(&self) -> bool {
        self.skip_dehyphenation
    }

    pub fn force_character_split(&self) -> bool {
        self.force_character_split
    }

    pub fn auto_merge_paragraphs(&self) -> bool {
        self.auto_merge_paragraphs
    }

    pub fn never_split_paragraphs(&self) -> bool {
        self.never_split_paragraphs
    }

    pub fn verbose_trace(&self) -> bool {
        self.verbose_trace
    }

    pub fn ligature_repair(&self) -> bool {
        self.ligature_repair
    }

    pub fn paragraph_tags(&self) -> &[String] {
        &self.paragraph_tags
    }

    pub fn repair_ligatures(&self) -> &[String] {
        &self.repair_ligatures
    }

    pub fn is_paragraph_tag(&self, tag: &str) -> bool {
        self.paragraph_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Builder for [`RepairConfig`].
///
/// Fails in [`build()`](Self::build) when flags contradict each other.
#[derive(Debug, Clone, Default)]
pub struct RepairConfigBuilder {
    lowercase_fold: Option<bool>,
    skip_merge: Option<bool>,
    skip_dehyphenation: Option<bool>,
    force_character_split: Option<bool>,
    auto_merge_paragraphs: Option<bool>,
    never_split_paragraphs: Option<bool>,
    verbose_trace: Option<bool>,
    ligature_repair: Option<bool>,
    paragraph_tags: ListOverride<String>,
    repair_ligatures: ListOverride<String>,
}

impl RepairConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Flags ──

    pub fn lowercase_fold(mut self, on: bool) -> Self {
        self.lowercase_fold = Some(on);
        self
    }

    pub fn skip_merge(mut self, on: bool) -> Self {
        self.skip_merge = Some(on);
        self
    }

    pub fn skip_dehyphenation(mut self, on: bool) -> Self {
        self.skip_dehyphenation = Some(on);
        self
    }

    pub fn force_character_split(mut self, on: bool) -> Self {
        self.force_character_split = Some(on);
        self
    }

    pub fn auto_merge_paragraphs(mut self, on: bool) -> Self {
        self.auto_merge_paragraphs = Some(on);
        self
    }

    pub fn never_split_paragraphs(mut self, on: bool) -> Self {
        self.never_split_paragraphs = Some(on);
        self
    }

    pub fn verbose_trace(mut self, on: bool) -> Self {
        self.verbose_trace = Some(on);
        self
    }

    pub fn ligature_repair(mut self, on: bool) -> Self {
        self.ligature_repair = Some(on);
        self
    }

    // ── Paragraph tags ──

    pub fn set_paragraph_tags(mut self, tags: Vec<String>) -> Self {
        self.paragraph_tags = ListOverride::Replace(tags);
        self
    }

    pub fn add_paragraph_tag(mut self, tag: String) -> Self {
        match &mut self.paragraph_tags {
            ListOverride::Extend(v) => v.push(tag),
            _ => self.paragraph_tags = ListOverride::Extend(vec![tag]),
        }
        self
    }

    // ── Repair ligatures ──

    pub fn set_repair_ligatures(mut self, ligatures: Vec<String>) -> Self {
        self.repair_ligatures = ListOverride::Replace(ligatures);
        self
    }

    pub fn add_repair_ligature(mut self, ligature: String) -> Self {
        match &mut self.repair_ligatures {
            ListOverride::Extend(v) => v.push(ligature),
            _ => self.repair_ligatures = ListOverride::Extend(vec![ligature]),
        }
        self
    }

    /// Resolve list overrides and validate flag combinations.
    pub fn build(self) -> Result<RepairConfig, ConfigError> {
        let defaults = RepairConfig::default();

        let skip_merge = self.skip_merge.unwrap_or(defaults.skip_merge);
        let force_character_split = self
            .force_character_split
            .unwrap_or(defaults.force_character_split);
        if skip_merge && force_character_split {
            return Err(ConfigError::CharacterSplitWithoutMerge);
        }

        let paragraph_tags: Vec<String> = self
            .paragraph_tags
            .resolve(&defaults.paragraph_tags)
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if paragraph_tags.is_empty() {
            return Err(ConfigError::NoParagraphTags);
        }

        let mut repair_ligatures = self.repair_ligatures.resolve(&defaults.repair_ligatures);
        if repair_ligatures.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::BlankLigature);
        }
        let mut seen = Vec::with_capacity(repair_ligatures.len());
        repair_ligatures.retain(|l| {
            if seen.contains(l) {
                false
            } else {
                seen.push(l.clone());
                true
            }
        });
        repair_ligatures.sort_by_key(|l| std::cmp::Reverse(l.chars().count()));

        Ok(RepairConfig {
            lowercase_fold: self.lowercase_fold.unwrap_or(defaults.lowercase_fold),
            skip_merge,
            skip_dehyphenation: self
                .skip_dehyphenation
                .unwrap_or(defaults.skip_dehyphenation),
            force_character_split,
            auto_merge_paragraphs: self
                .auto_merge_paragraphs
                .unwrap_or(defaults.auto_merge_paragraphs),
            never_split_paragraphs: self
                .never_split_paragraphs
                .unwrap_or(defaults.never_split_paragraphs),
            verbose_trace: self.verbose_trace.unwrap_or(defaults.verbose_trace),
            ligature_repair: self.ligature_repair.unwrap_or(defaults.ligature_repair),
            paragraph_tags,
            repair_ligatures,
        })
    }
}
