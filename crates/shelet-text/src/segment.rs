//! Script segmentation.
//!
//! Splits a string into ordered runs of directional text and emoji so each
//! run can be measured and rendered correctly. Emoji sequences built from
//! several codepoints (skin-tone modifiers, ZWJ families, keycaps, flags)
//! are single grapheme clusters and are never split across runs.

use unicode_segmentation::UnicodeSegmentation;

/// The kind of content a run holds. Runs never mix kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Plain directional text, subject to bidi reordering.
    Directional,
    /// One or more emoji clusters, excluded from reordering.
    Emoji,
}

/// A contiguous slice of the source string of a single kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub kind: RunKind,
    pub content: String,
}

/// Ordered runs of one source string, in original logical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub runs: Vec<TextRun>,
}

impl Segmentation {
    /// Concatenate run contents back into the source string.
    pub fn reconstruct(&self) -> String {
        self.runs.iter().map(|r| r.content.as_str()).collect()
    }

    /// Number of emoji grapheme clusters across all emoji runs.
    pub fn emoji_cluster_count(&self) -> usize {
        self.runs
            .iter()
            .filter(|r| r.kind == RunKind::Emoji)
            .map(|r| r.content.graphemes(true).count())
            .sum()
    }
}

/// Split `text` into ordered directional/emoji runs.
pub fn segment(text: &str) -> Segmentation {
    let mut runs: Vec<TextRun> = Vec::new();

    for cluster in text.graphemes(true) {
        let kind = if is_emoji_cluster(cluster) {
            RunKind::Emoji
        } else {
            RunKind::Directional
        };
        match runs.last_mut() {
            Some(run) if run.kind == kind => run.content.push_str(cluster),
            _ => runs.push(TextRun {
                kind,
                content: cluster.to_string(),
            }),
        }
    }

    Segmentation { runs }
}

/// True when the grapheme cluster is a known emoji sequence, including
/// modifier and ZWJ sequences.
pub fn is_emoji_cluster(cluster: &str) -> bool {
    emojis::get(cluster).is_some()
}
