//! Font loading and measurement.
//!
//! Uses fontdue for CPU-based rasterization. The `FontBook` is loaded once
//! at engine start from the configured asset paths and shared read-only by
//! every render request; a missing or unparsable font is a fatal asset
//! error raised before any drawing happens.

use std::path::Path;
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use unicode_segmentation::UnicodeSegmentation;

use shelet_core::{AssetsConfig, SheletError, SheletResult};

use crate::segment::{segment, RunKind};

/// Which configured font a piece of text is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Headline,
    Body,
}

/// The engine's loaded fonts, shared read-only across render requests.
pub struct FontBook {
    headline: Arc<Font>,
    body: Arc<Font>,
    emoji: Option<Arc<Font>>,
}

impl FontBook {
    /// Load every configured font. Fails fast on any missing or invalid file.
    pub fn load(assets: &AssetsConfig) -> SheletResult<Self> {
        let headline = Arc::new(load_font(&assets.font_bold)?);
        let body = if assets.font_regular == assets.font_bold {
            Arc::clone(&headline)
        } else {
            Arc::new(load_font(&assets.font_regular)?)
        };
        let emoji = match &assets.emoji_font {
            Some(path) => Some(Arc::new(load_font(path)?)),
            None => None,
        };
        tracing::info!(
            headline = %assets.font_bold.display(),
            body = %assets.font_regular.display(),
            emoji = assets.emoji_font.is_some(),
            "loaded fonts"
        );
        Ok(Self {
            headline,
            body,
            emoji,
        })
    }

    pub fn font(&self, role: FontRole) -> &Font {
        match role {
            FontRole::Headline => &self.headline,
            FontRole::Body => &self.body,
        }
    }

    /// Shared handle to a role font.
    pub fn shared(&self, role: FontRole) -> Arc<Font> {
        match role {
            FontRole::Headline => Arc::clone(&self.headline),
            FontRole::Body => Arc::clone(&self.body),
        }
    }

    /// The dedicated emoji font, when one is configured.
    pub fn emoji_font(&self) -> Option<Arc<Font>> {
        self.emoji.clone()
    }

    /// Measured advance width of a display-order string at `px`.
    ///
    /// Directional runs use the role font's glyph advances; emoji clusters
    /// are budgeted one em square each, matching how the compositor draws
    /// them.
    pub fn measure_width(&self, role: FontRole, text: &str, px: f32) -> f32 {
        let font = self.font(role);
        let mut width = 0.0f32;
        for run in &segment(text).runs {
            match run.kind {
                RunKind::Directional => {
                    for ch in run.content.chars() {
                        width += font.metrics(ch, px).advance_width;
                    }
                }
                RunKind::Emoji => {
                    width += px * run.content.graphemes(true).count() as f32;
                }
            }
        }
        width
    }

    /// Stacked line height at `px`, including the configured leading.
    pub fn line_height(&self, role: FontRole, px: f32, leading: u32) -> f32 {
        match self.font(role).horizontal_line_metrics(px) {
            Some(m) => m.ascent - m.descent + leading as f32,
            None => px * 1.2 + leading as f32,
        }
    }

    /// Distance from the top of the line box to the baseline at `px`.
    pub fn ascent(&self, role: FontRole, px: f32) -> f32 {
        match self.font(role).horizontal_line_metrics(px) {
            Some(m) => m.ascent,
            None => px,
        }
    }
}

fn load_font(path: &Path) -> SheletResult<Font> {
    let data = std::fs::read(path)
        .map_err(|e| SheletError::asset(format!("failed to read font file: {}", e), path))?;
    Font::from_bytes(data, FontSettings::default())
        .map_err(|e| SheletError::asset(format!("failed to parse font: {}", e), path))
}
