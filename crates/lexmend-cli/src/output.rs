use std::io::Write;

use lexmend_core::{RepairEvent, Segmentation};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the repair trace, one decision per line.
pub fn print_trace(w: &mut dyn Write, events: &[RepairEvent], color: ColorMode) -> std::io::Result<()> {
    for event in events {
        let line = event.to_string();
        if !color.enabled() {
            writeln!(w, "{}", line)?;
            continue;
        }
        match event {
            RepairEvent::Merged { .. } => writeln!(w, "{}", line.green())?,
            RepairEvent::HyphenJoined { .. } | RepairEvent::Dehyphenated { .. } => {
                writeln!(w, "{}", line.cyan())?
            }
            RepairEvent::HyphenKept { .. } => writeln!(w, "{}", line.dimmed())?,
            RepairEvent::LigatureMerged { .. } | RepairEvent::LigatureAffixed { .. } => {
                writeln!(w, "{}", line.magenta())?
            }
            RepairEvent::Resplit { .. } => writeln!(w, "{}", line.yellow())?,
            RepairEvent::ParagraphContinued { .. } => writeln!(w, "{}", line.blue())?,
        }
    }
    Ok(())
}

/// Print the segmented words on one line.
pub fn print_segmentation(w: &mut dyn Write, seg: &Segmentation) -> std::io::Result<()> {
    writeln!(w, "{}", seg.words.join(" "))
}

/// Print the score and search counters of a segmentation.
pub fn print_search_stats(
    w: &mut dyn Write,
    seg: &Segmentation,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = format!(
        "score {:.3}, {} candidates, longest {} chars",
        seg.score, seg.stats.candidates, seg.stats.longest_candidate
    );
    if color.enabled() {
        writeln!(w, "{}", msg.dimmed())
    } else {
        writeln!(w, "{}", msg)
    }
}

/// Print the vocabulary summary after collection.
pub fn print_collection_summary(
    w: &mut dyn Write,
    passes: usize,
    words: usize,
    max_word_length: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let msg = format!(
        "Collected {} distinct words from {} passes (longest {} chars)",
        words, passes, max_word_length
    );
    if color.enabled() {
        writeln!(w, "{}", msg.bold())
    } else {
        writeln!(w, "{}", msg)
    }
}
