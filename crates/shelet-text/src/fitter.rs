//! Auto-fit text layout.
//!
//! Finds a font size and a wrapped line list that satisfy a block's width
//! and height budgets. Measurement goes through [`TextMeasure`] so the
//! search is testable with a fixed-advance measure, and every candidate
//! line is measured in the same display order it will later be drawn in
//! (the shaping consistency invariant).

use serde::Serialize;

use crate::font::{FontBook, FontRole};
use crate::shaping::TextShapingStrategy;

/// Width and line-height measurement at a candidate size.
pub trait TextMeasure {
    /// Advance width of a display-order string at `px`.
    fn width(&self, text: &str, px: f32) -> f32;
    /// Stacked line height at `px`.
    fn line_height(&self, px: f32) -> f32;
}

/// Production measure backed by a loaded font.
pub struct RoleMeasure<'a> {
    pub book: &'a FontBook,
    pub role: FontRole,
    pub leading: u32,
}

impl TextMeasure for RoleMeasure<'_> {
    fn width(&self, text: &str, px: f32) -> f32 {
        self.book.measure_width(self.role, text, px)
    }

    fn line_height(&self, px: f32) -> f32 {
        self.book.line_height(self.role, px, self.leading)
    }
}

/// The size search space: start high, decrement by `step`, floor at `min`.
#[derive(Debug, Clone, Copy)]
pub struct SizeRange {
    pub start: u32,
    pub min: u32,
    pub step: u32,
}

impl SizeRange {
    fn shrink(&self, size: u32) -> u32 {
        size.saturating_sub(self.step.max(1)).max(self.min)
    }
}

/// A chosen font size and the final wrapped lines, in logical order.
///
/// `font_size == min` marks the declared overflow-at-floor case: the block
/// may exceed its budget rather than shrink further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FitResult {
    pub font_size: u32,
    pub lines: Vec<String>,
}

/// Fit a single-line headline: shrink while the measured display width
/// exceeds `max_width`, stopping at the floor even if still too wide.
pub fn fit_headline(
    measure: &dyn TextMeasure,
    shaper: &dyn TextShapingStrategy,
    text: &str,
    max_width: f32,
    sizes: SizeRange,
) -> FitResult {
    let display = shaper.display(text);
    let mut size = sizes.start;
    while size > sizes.min && measure.width(&display, size as f32) > max_width {
        size = sizes.shrink(size);
    }
    FitResult {
        font_size: size,
        lines: vec![text.to_string()],
    }
}

/// Fit a multi-line body: greedy word wrap per paragraph at each candidate
/// size, shrinking while the stacked height exceeds `max_height` (or a
/// single over-long word still overflows the width), with forced acceptance
/// at the floor.
pub fn fit_body(
    measure: &dyn TextMeasure,
    shaper: &dyn TextShapingStrategy,
    text: &str,
    max_width: f32,
    max_height: f32,
    sizes: SizeRange,
) -> FitResult {
    let mut size = sizes.start;
    loop {
        let lines = flow_paragraphs(measure, shaper, text, max_width, size as f32);
        let total_height = lines.len() as f32 * measure.line_height(size as f32);
        let widest = lines
            .iter()
            .map(|l| measure.width(&shaper.display(l), size as f32))
            .fold(0.0f32, f32::max);

        if (total_height <= max_height && widest <= max_width) || size <= sizes.min {
            return FitResult {
                font_size: size,
                lines,
            };
        }
        size = sizes.shrink(size);
    }
}

/// Split into user-declared paragraphs (blank lines preserved as empty
/// lines) and wrap each one.
fn flow_paragraphs(
    measure: &dyn TextMeasure,
    shaper: &dyn TextShapingStrategy,
    text: &str,
    max_width: f32,
    px: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(wrap_paragraph(measure, shaper, paragraph, max_width, px));
    }
    lines
}

/// Greedy word wrap: append words while the measured display width of the
/// candidate line fits; an over-long single word goes onto its own line
/// rather than looping forever.
fn wrap_paragraph(
    measure: &dyn TextMeasure,
    shaper: &dyn TextShapingStrategy,
    paragraph: &str,
    max_width: f32,
    px: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in paragraph.split_whitespace() {
        let mut candidate = current.clone();
        candidate.push(word);
        let joined = candidate.join(" ");

        if measure.width(&shaper.display(&joined), px) <= max_width {
            current = candidate;
        } else if current.is_empty() {
            lines.push(word.to_string());
        } else {
            lines.push(current.join(" "));
            current = vec![word];
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }
    lines
}
