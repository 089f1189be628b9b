use std::path::{Path, PathBuf};

use lexmend_core::RepairConfigBuilder;
use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub repair: Option<RepairSection>,
    pub input: Option<InputSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepairSection {
    pub lowercase_fold: Option<bool>,
    pub skip_merge: Option<bool>,
    pub skip_dehyphenation: Option<bool>,
    pub force_character_split: Option<bool>,
    pub auto_merge_paragraphs: Option<bool>,
    pub never_split_paragraphs: Option<bool>,
    pub ligature_repair: Option<bool>,
    /// Replaces the default paragraph tags.
    pub paragraph_tags: Option<Vec<String>>,
    /// Replaces the default repair ligature strings.
    pub repair_ligatures: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSection {
    pub lexicon: Option<String>,
    /// Count the primary extraction's own text as a pass.
    pub count_primary: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    /// `xhtml`, `text` or `json`.
    pub format: Option<String>,
    pub color: Option<bool>,
}

impl ConfigFile {
    /// Start a [`RepairConfigBuilder`] from the file's `[repair]` table.
    pub fn repair_builder(&self) -> RepairConfigBuilder {
        let mut builder = RepairConfigBuilder::new();
        let Some(repair) = &self.repair else {
            return builder;
        };
        if let Some(on) = repair.lowercase_fold {
            builder = builder.lowercase_fold(on);
        }
        if let Some(on) = repair.skip_merge {
            builder = builder.skip_merge(on);
        }
        if let Some(on) = repair.skip_dehyphenation {
            builder = builder.skip_dehyphenation(on);
        }
        if let Some(on) = repair.force_character_split {
            builder = builder.force_character_split(on);
        }
        if let Some(on) = repair.auto_merge_paragraphs {
            builder = builder.auto_merge_paragraphs(on);
        }
        if let Some(on) = repair.never_split_paragraphs {
            builder = builder.never_split_paragraphs(on);
        }
        if let Some(on) = repair.ligature_repair {
            builder = builder.ligature_repair(on);
        }
        if let Some(tags) = &repair.paragraph_tags {
            builder = builder.set_paragraph_tags(tags.clone());
        }
        if let Some(ligatures) = &repair.repair_ligatures {
            builder = builder.set_repair_ligatures(ligatures.clone());
        }
        builder
    }

    pub fn lexicon(&self) -> Option<PathBuf> {
        self.input
            .as_ref()
            .and_then(|i| i.lexicon.as_ref())
            .map(PathBuf::from)
    }

    pub fn count_primary(&self) -> bool {
        self.input
            .as_ref()
            .and_then(|i| i.count_primary)
            .unwrap_or(true)
    }

    pub fn format(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.format.as_deref())
    }

    pub fn color(&self) -> bool {
        self.output.as_ref().and_then(|o| o.color).unwrap_or(true)
    }
}

/// Platform config directory path: `<config_dir>/lexmend/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lexmend").join("config.toml"))
}

/// Load config by cascading CWD `.lexmend.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".lexmend.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let repair = |f: fn(&RepairSection) -> Option<bool>| {
        overlay
            .repair
            .as_ref()
            .and_then(f)
            .or_else(|| base.repair.as_ref().and_then(f))
    };
    ConfigFile {
        repair: Some(RepairSection {
            lowercase_fold: repair(|r| r.lowercase_fold),
            skip_merge: repair(|r| r.skip_merge),
            skip_dehyphenation: repair(|r| r.skip_dehyphenation),
            force_character_split: repair(|r| r.force_character_split),
            auto_merge_paragraphs: repair(|r| r.auto_merge_paragraphs),
            never_split_paragraphs: repair(|r| r.never_split_paragraphs),
            ligature_repair: repair(|r| r.ligature_repair),
            paragraph_tags: overlay
                .repair
                .as_ref()
                .and_then(|r| r.paragraph_tags.clone())
                .or_else(|| base.repair.as_ref().and_then(|r| r.paragraph_tags.clone())),
            repair_ligatures: overlay
                .repair
                .as_ref()
                .and_then(|r| r.repair_ligatures.clone())
                .or_else(|| {
                    base.repair
                        .as_ref()
                        .and_then(|r| r.repair_ligatures.clone())
                }),
        }),
        input: Some(InputSection {
            lexicon: overlay
                .input
                .as_ref()
                .and_then(|i| i.lexicon.clone())
                .or_else(|| base.input.as_ref().and_then(|i| i.lexicon.clone())),
            count_primary: overlay
                .input
                .as_ref()
                .and_then(|i| i.count_primary)
                .or_else(|| base.input.as_ref().and_then(|i| i.count_primary)),
        }),
        output: Some(OutputSection {
            format: overlay
                .output
                .as_ref()
                .and_then(|o| o.format.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.format.clone())),
            color: overlay
                .output
                .as_ref()
                .and_then(|o| o.color)
                .or_else(|| base.output.as_ref().and_then(|o| o.color)),
        }),
    }
}
