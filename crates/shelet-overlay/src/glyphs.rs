//! Glyph drawing: stroked, centered text lines on transparent layers.
//!
//! A line arrives here already in display order (the shaping strategy has
//! run); this module only places and rasterizes. Directional glyphs get a
//! stroke outline pass before the fill pass so every glyph stays legible
//! over arbitrary video backgrounds; emoji bitmaps are pasted unstroked.

use shelet_core::FrameBuffer;
use shelet_text::{segment, FontBook, FontRole, RunKind};
use unicode_segmentation::UnicodeSegmentation;

use crate::emoji::EmojiChain;

/// Fill and stroke styling for one text role.
#[derive(Debug, Clone)]
pub struct LineStyle {
    pub fill: [u8; 4],
    pub stroke: [u8; 4],
    pub stroke_width: u32,
}

enum Placement<'a> {
    Glyph { ch: char, x: f32 },
    Emoji { cluster: &'a str, x: f32 },
}

/// Draw one display-order line so its measured bounding box is centered on
/// `center`, horizontally and vertically.
pub fn draw_line_centered(
    layer: &mut FrameBuffer,
    book: &FontBook,
    role: FontRole,
    chain: &EmojiChain,
    display_text: &str,
    px: f32,
    center: (i32, i32),
    style: &LineStyle,
) {
    let width = book.measure_width(role, display_text, px);
    let ascent = book.ascent(role, px);
    let box_height = book.line_height(role, px, 0);

    let start_x = center.0 as f32 - width / 2.0;
    let baseline = center.1 as f32 - box_height / 2.0 + ascent;

    let seg = segment(display_text);
    let font = book.font(role);

    // Lay out every placement once; the stroke and fill passes share it.
    let mut placements: Vec<Placement> = Vec::new();
    let mut cursor = start_x;
    for run in &seg.runs {
        match run.kind {
            RunKind::Directional => {
                for ch in run.content.chars() {
                    placements.push(Placement::Glyph { ch, x: cursor });
                    cursor += font.metrics(ch, px).advance_width;
                }
            }
            RunKind::Emoji => {
                for cluster in run.content.graphemes(true) {
                    placements.push(Placement::Emoji { cluster, x: cursor });
                    cursor += px;
                }
            }
        }
    }

    // Stroke pass: stamp each glyph at every offset within the stroke
    // radius, before any fill lands.
    if style.stroke_width > 0 {
        let offsets = stroke_offsets(style.stroke_width);
        for placement in &placements {
            if let Placement::Glyph { ch, x } = placement {
                let (metrics, bitmap) = font.rasterize(*ch, px);
                let gx = (*x + metrics.xmin as f32).round() as i32;
                let gy = (baseline - (metrics.height as i32 + metrics.ymin) as f32).round() as i32;
                for (ox, oy) in &offsets {
                    layer.stamp_coverage(
                        &bitmap,
                        metrics.width,
                        metrics.height,
                        gx + ox,
                        gy + oy,
                        style.stroke,
                    );
                }
            }
        }
    }

    // Fill pass.
    for placement in &placements {
        match placement {
            Placement::Glyph { ch, x } => {
                let (metrics, bitmap) = font.rasterize(*ch, px);
                let gx = (*x + metrics.xmin as f32).round() as i32;
                let gy = (baseline - (metrics.height as i32 + metrics.ymin) as f32).round() as i32;
                layer.stamp_coverage(
                    &bitmap,
                    metrics.width,
                    metrics.height,
                    gx,
                    gy,
                    style.fill,
                );
            }
            Placement::Emoji { cluster, x } => {
                let glyph = chain.render(cluster, px);
                let ex = x.round() as i32;
                let ey = (center.1 as f32 - px / 2.0).round() as i32;
                layer.composite_over(&glyph, ex, ey);
            }
        }
    }
}

/// All integer offsets within the stroke radius.
fn stroke_offsets(width: u32) -> Vec<(i32, i32)> {
    let r = width as i32;
    let mut offsets = Vec::new();
    for oy in -r..=r {
        for ox in -r..=r {
            if ox * ox + oy * oy <= r * r {
                offsets.push((ox, oy));
            }
        }
    }
    offsets
}
