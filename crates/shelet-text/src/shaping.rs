//! Text shaping strategies.
//!
//! The engine must measure and draw text with the *same* strategy — a
//! deployment whose rasterizer performs complex text layout natively passes
//! strings through untouched, while the basic-layout rasterizer needs
//! explicit visual reordering of right-to-left content. The strategy is
//! selected once, from the engine's capability flag, and shared by the
//! fitter and the compositor.

use unicode_bidi::{BidiInfo, Level};

use crate::segment::{segment, RunKind};

/// Transforms a logical-order string into the form handed to the rasterizer.
pub trait TextShapingStrategy: Send + Sync {
    fn display(&self, text: &str) -> String;
}

/// Pass-through for renderers with native complex-text-layout support.
pub struct NativeShaping;

impl TextShapingStrategy for NativeShaping {
    fn display(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Explicit visual reordering for basic-layout rasterizers.
///
/// Directional runs are reordered to visual order under a right-to-left
/// base direction; emoji runs keep their content untouched; the run
/// sequence itself is then reversed so the reassembled string reads
/// correctly when drawn left-to-right.
pub struct VisualReorder;

impl TextShapingStrategy for VisualReorder {
    fn display(&self, text: &str) -> String {
        let seg = segment(text);
        let mut parts: Vec<String> = seg
            .runs
            .iter()
            .map(|run| match run.kind {
                RunKind::Directional => reorder_rtl(&run.content),
                RunKind::Emoji => run.content.clone(),
            })
            .collect();
        parts.reverse();
        parts.concat()
    }
}

/// Reorder one directional run to visual order with an RTL base level.
fn reorder_rtl(text: &str) -> String {
    let bidi = BidiInfo::new(text, Some(Level::rtl()));
    let mut out = String::with_capacity(text.len());
    for para in &bidi.paragraphs {
        out.push_str(&bidi.reorder_line(para, para.range.clone()));
    }
    out
}

/// Select the strategy matching the deployment's layout capability.
pub fn strategy_for(complex_layout: bool) -> Box<dyn TextShapingStrategy> {
    if complex_layout {
        Box::new(NativeShaping)
    } else {
        Box::new(VisualReorder)
    }
}
