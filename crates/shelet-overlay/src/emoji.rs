//! Emoji glyph rendering with an ordered fallback chain.
//!
//! Emoji are drawn through a dedicated renderer rather than the text font's
//! layout path. Sources are tried in order — the configured emoji font,
//! then the text font's own glyphs, then a plain tofu box — so a failing
//! source degrades the glyph, never the render.

use std::sync::Arc;

use fontdue::Font;

use shelet_core::FrameBuffer;

/// One way of producing a bitmap for an emoji cluster.
pub trait EmojiGlyphSource: Send + Sync {
    fn name(&self) -> &'static str;
    /// Render the cluster into an em-square buffer, or None if this source
    /// cannot produce a glyph for it.
    fn render(&self, cluster: &str, px: f32) -> Option<FrameBuffer>;
}

/// Renders the cluster's base scalar from a font, when the font covers it.
pub struct FontGlyphSource {
    name: &'static str,
    font: Arc<Font>,
}

impl FontGlyphSource {
    pub fn new(name: &'static str, font: Arc<Font>) -> Self {
        Self { name, font }
    }
}

impl EmojiGlyphSource for FontGlyphSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn render(&self, cluster: &str, px: f32) -> Option<FrameBuffer> {
        // Variation selectors and joiners carry no glyph of their own; the
        // first covered scalar stands in for the sequence.
        let base = cluster
            .chars()
            .find(|&c| !is_joiner(c) && self.font.lookup_glyph_index(c) != 0)?;

        let (metrics, bitmap) = self.font.rasterize(base, px);
        if metrics.width == 0 || metrics.height == 0 {
            return None;
        }

        let side = px.ceil() as u32;
        let mut out = FrameBuffer::new(side, side);
        let dx = (side as i32 - metrics.width as i32) / 2;
        let dy = (side as i32 - metrics.height as i32) / 2;
        out.stamp_coverage(
            &bitmap,
            metrics.width,
            metrics.height,
            dx,
            dy,
            [255, 255, 255, 255],
        );
        Some(out)
    }
}

fn is_joiner(c: char) -> bool {
    matches!(c, '\u{200d}' | '\u{fe0e}' | '\u{fe0f}')
}

/// Last-resort glyph box: a hollow square the size of the em.
pub struct TofuGlyphSource;

impl EmojiGlyphSource for TofuGlyphSource {
    fn name(&self) -> &'static str {
        "tofu"
    }

    fn render(&self, _cluster: &str, px: f32) -> Option<FrameBuffer> {
        let side = (px.ceil() as u32).max(4);
        let mut out = FrameBuffer::new(side, side);
        let margin = (side as f32 * 0.1) as u32;
        let lo = margin;
        let hi = side - margin - 1;
        for i in lo..=hi {
            for t in 0..2u32 {
                out.set_pixel(i, lo + t, [255, 255, 255, 255]);
                out.set_pixel(i, hi - t, [255, 255, 255, 255]);
                out.set_pixel(lo + t, i, [255, 255, 255, 255]);
                out.set_pixel(hi - t, i, [255, 255, 255, 255]);
            }
        }
        Some(out)
    }
}

/// The ordered fallback chain. Rendering never fails; falling past the
/// preferred source is logged as a degradation.
pub struct EmojiChain {
    sources: Vec<Box<dyn EmojiGlyphSource>>,
}

impl EmojiChain {
    pub fn new(sources: Vec<Box<dyn EmojiGlyphSource>>) -> Self {
        Self { sources }
    }

    /// Build the deployment chain: configured emoji font first, then the
    /// text font, then tofu.
    pub fn from_fonts(emoji_font: Option<Arc<Font>>, text_font: Arc<Font>) -> Self {
        let mut sources: Vec<Box<dyn EmojiGlyphSource>> = Vec::new();
        if let Some(font) = emoji_font {
            sources.push(Box::new(FontGlyphSource::new("emoji-font", font)));
        }
        sources.push(Box::new(FontGlyphSource::new("text-font", text_font)));
        sources.push(Box::new(TofuGlyphSource));
        Self { sources }
    }

    pub fn render(&self, cluster: &str, px: f32) -> FrameBuffer {
        for (i, source) in self.sources.iter().enumerate() {
            if let Some(fb) = source.render(cluster, px) {
                if i > 0 {
                    tracing::warn!(
                        source = source.name(),
                        cluster,
                        "preferred emoji renderer failed, fell back"
                    );
                }
                return fb;
            }
        }
        // The tofu source is infallible, but keep the chain total anyway.
        FrameBuffer::new(px.ceil() as u32, px.ceil() as u32)
    }
}
