//! Human-readable record of repair decisions.
//!
//! The trace is a side channel: it is handed back next to the repaired
//! document and never mixed into the primary output.

use std::fmt;

use serde::Serialize;

/// One merge, split, or join decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RepairEvent {
    /// Several input tokens were segmented into one word.
    Merged { parts: Vec<String>, word: String },
    /// A hyphenated line break was joined without the hyphen.
    HyphenJoined { line: String, next: String },
    /// A hyphenated line break kept its hyphen.
    HyphenKept { line: String, next: String },
    /// An interior hyphen was removed from a single word.
    Dehyphenated { from: String, to: String },
    /// Two adjacent words merged, optionally around a restored ligature.
    LigatureMerged {
        left: String,
        right: String,
        ligature: Option<String>,
        word: String,
    },
    /// A restored ligature was prefixed or suffixed to one word.
    LigatureAffixed { from: String, to: String },
    /// A run-on word was split at character level.
    Resplit { from: String, to: Vec<String> },
    /// A block continued the open paragraph.
    ParagraphContinued { tag: String, first_word: String },
}

impl fmt::Display for RepairEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepairEvent::Merged { parts, word } => {
                write!(f, "merge: {} -> {}", parts.join(" + "), word)
            }
            RepairEvent::HyphenJoined { line, next } => {
                write!(f, "dehyphenate line: \"{}\" + \"{}\" (joined)", line, next)
            }
            RepairEvent::HyphenKept { line, next } => {
                write!(f, "dehyphenate line: \"{}\" + \"{}\" (hyphen kept)", line, next)
            }
            RepairEvent::Dehyphenated { from, to } => {
                write!(f, "dehyphenate word: {} -> {}", from, to)
            }
            RepairEvent::LigatureMerged {
                left,
                right,
                ligature: Some(lig),
                word,
            } => write!(f, "ligature merge: {} + [{}] + {} -> {}", left, lig, right, word),
            RepairEvent::LigatureMerged {
                left,
                right,
                ligature: None,
                word,
            } => write!(f, "ligature merge: {} + {} -> {}", left, right, word),
            RepairEvent::LigatureAffixed { from, to } => {
                write!(f, "ligature affix: {} -> {}", from, to)
            }
            RepairEvent::Resplit { from, to } => {
                write!(f, "split: {} -> {}", from, to.join(" | "))
            }
            RepairEvent::ParagraphContinued { tag, first_word } => {
                write!(f, "paragraph: <{}> continues with \"{}\"", tag, first_word)
            }
        }
    }
}

/// Collector for [`RepairEvent`]s.
///
/// Events are always logged at trace level; they are only kept when the
/// trace is enabled.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    enabled: bool,
    events: Vec<RepairEvent>,
}

impl Trace {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            events: Vec::new(),
        }
    }

    /// A trace that keeps nothing.
    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&mut self, event: RepairEvent) {
        tracing::trace!(%event, "repair");
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[RepairEvent] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<RepairEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_trace_keeps_nothing() {
        let mut trace = Trace::disabled();
        trace.record(RepairEvent::Dehyphenated {
            from: "combus-tibles".into(),
            to: "combustibles".into(),
        });
        assert!(trace.events().is_empty());
    }

    #[test]
    fn test_enabled_trace_keeps_events_in_order() {
        let mut trace = Trace::new(true);
        trace.record(RepairEvent::Merged {
            parts: vec!["R".into(), "A".into()],
            word: "RA".into(),
        });
        trace.record(RepairEvent::Resplit {
            from: "wordWord".into(),
            to: vec!["word".into(), "Word".into()],
        });
        let events = trace.take();
        assert_eq!(events.len(), 2);
        assert!(trace.events().is_empty());
    }

    #[test]
    fn test_display() {
        let merged = RepairEvent::LigatureMerged {
            left: "E".into(),
            right: "zienz".into(),
            ligature: Some("ffi".into()),
            word: "Effizienz".into(),
        };
        assert_eq!(
            merged.to_string(),
            "ligature merge: E + [ffi] + zienz -> Effizienz"
        );
        let merged = RepairEvent::Merged {
            parts: vec!["R".into(), "A".into(), "P".into()],
            word: "RAP".into(),
        };
        assert_eq!(merged.to_string(), "merge: R + A + P -> RAP");
    }
}
