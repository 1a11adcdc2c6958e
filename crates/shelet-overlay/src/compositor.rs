//! The overlay compositor.
//!
//! Renders the headline and body onto separate transparent layers over the
//! fixed background artwork and saves the composed RGBA canvas as the
//! overlay artifact consumed by the filter graph. Order is significant and
//! never changes: per layer, shadow first, text on top; headline before
//! body.

use std::path::PathBuf;

use shelet_core::{
    Color, EngineConfig, FrameBuffer, SheletError, SheletResult, TextRoleConfig,
};
use shelet_text::{
    fit_body, fit_headline, strategy_for, FontBook, FontRole, RoleMeasure, SizeRange,
    TextShapingStrategy,
};

use crate::emoji::EmojiChain;
use crate::glyphs::{draw_line_centered, LineStyle};
use crate::raster;
use crate::shadow::shadow_of;

/// Everything loaded once at engine start and shared read-only by every
/// render request: configuration, template artwork, fonts, the emoji
/// fallback chain and the shaping strategy.
pub struct EngineAssets {
    pub config: EngineConfig,
    pub template: FrameBuffer,
    pub fonts: FontBook,
    pub emoji: EmojiChain,
    pub shaper: Box<dyn TextShapingStrategy>,
}

impl EngineAssets {
    /// Load fonts and template. Any missing or invalid asset aborts here,
    /// before a render call can create temp artifacts.
    pub fn load(config: EngineConfig) -> SheletResult<Self> {
        let fonts = FontBook::load(&config.assets)?;
        let template = raster::load_template(
            &config.assets.template,
            config.canvas.width,
            config.canvas.height,
        )?;
        let emoji = EmojiChain::from_fonts(fonts.emoji_font(), fonts.shared(FontRole::Body));
        let shaper = strategy_for(config.complex_layout);
        tracing::info!(
            complex_layout = config.complex_layout,
            "engine assets loaded"
        );
        Ok(Self {
            config,
            template,
            fonts,
            emoji,
            shaper,
        })
    }
}

/// Composes one overlay artifact per render request.
pub struct OverlayCompositor<'a> {
    assets: &'a EngineAssets,
}

impl<'a> OverlayCompositor<'a> {
    pub fn new(assets: &'a EngineAssets) -> Self {
        Self { assets }
    }

    /// Compose and save the overlay PNG; returns its path. The path is
    /// stable across calls within a process and overwritten, not versioned.
    pub fn compose(&self, headline: &str, body: &str) -> SheletResult<PathBuf> {
        let canvas = self.compose_canvas(headline, body)?;
        let temp_dir = &self.assets.config.encoder.temp_dir;
        std::fs::create_dir_all(temp_dir)?;
        let path = temp_dir.join("overlay.png");
        raster::save_png(&canvas, &path)?;
        tracing::info!(path = %path.display(), "overlay artifact written");
        Ok(path)
    }

    /// Compose the overlay canvas in memory (deterministic for identical
    /// inputs over an unchanged asset set).
    pub fn compose_canvas(&self, headline: &str, body: &str) -> SheletResult<FrameBuffer> {
        let cfg = &self.assets.config;
        let fonts = &self.assets.fonts;
        let shaper = self.assets.shaper.as_ref();

        let canvas_w = cfg.canvas.width;
        let canvas_h = cfg.canvas.height;
        let center_x = (canvas_w / 2) as i32;
        let safe_width = canvas_w as f32 * cfg.banner.safe_width_fraction;

        // 1. Base canvas: the pre-made artwork.
        let mut canvas = self.assets.template.clone();

        // 2. Fit both blocks.
        let headline_measure = RoleMeasure {
            book: fonts,
            role: FontRole::Headline,
            leading: cfg.headline.leading,
        };
        let headline_fit = fit_headline(
            &headline_measure,
            shaper,
            headline,
            safe_width,
            size_range(&cfg.headline),
        );

        let body_top = cfg.banner.top + cfg.body.offset_y;
        let body_bottom = cfg.banner.top + cfg.banner.height - cfg.body.bottom_margin;
        let body_measure = RoleMeasure {
            book: fonts,
            role: FontRole::Body,
            leading: cfg.body.leading,
        };
        let body_fit = fit_body(
            &body_measure,
            shaper,
            body,
            safe_width,
            (body_bottom - body_top) as f32,
            size_range(&cfg.body),
        );
        tracing::debug!(
            headline_size = headline_fit.font_size,
            body_size = body_fit.font_size,
            body_lines = body_fit.lines.len(),
            "text fit complete"
        );

        // 3. Draw each block into its own transparent layer.
        let mut title_layer = FrameBuffer::new(canvas_w, canvas_h);
        let headline_style = style_of(&cfg.headline)?;
        let headline_center = (center_x, cfg.banner.top + cfg.headline.offset_y);
        draw_line_centered(
            &mut title_layer,
            fonts,
            FontRole::Headline,
            &self.assets.emoji,
            &shaper.display(&headline_fit.lines[0]),
            headline_fit.font_size as f32,
            headline_center,
            &headline_style,
        );

        let mut body_layer = FrameBuffer::new(canvas_w, canvas_h);
        let body_style = style_of(&cfg.body)?;
        let body_px = body_fit.font_size as f32;
        let line_height = fonts.line_height(FontRole::Body, body_px, cfg.body.leading);
        let mut y = body_top as f32;
        for line in &body_fit.lines {
            if !line.is_empty() {
                let line_center = (center_x, (y + line_height / 2.0) as i32);
                draw_line_centered(
                    &mut body_layer,
                    fonts,
                    FontRole::Body,
                    &self.assets.emoji,
                    &shaper.display(line),
                    body_px,
                    line_center,
                    &body_style,
                );
            }
            y += line_height;
        }

        // 4.–5. Per layer: shadow first, then the text. Headline before body.
        if let Some(shadow) = shadow_of(&title_layer, cfg.headline.shadow_blur) {
            for offset in &cfg.headline.shadow_offsets {
                canvas.composite_over(&shadow, offset[0], offset[1]);
            }
        }
        canvas.composite_over(&title_layer, 0, 0);

        if let Some(shadow) = shadow_of(&body_layer, cfg.body.shadow_blur) {
            for offset in &cfg.body.shadow_offsets {
                canvas.composite_over(&shadow, offset[0], offset[1]);
            }
        }
        canvas.composite_over(&body_layer, 0, 0);

        Ok(canvas)
    }
}

fn size_range(role: &TextRoleConfig) -> SizeRange {
    SizeRange {
        start: role.start_size,
        min: role.min_size,
        step: role.step,
    }
}

fn style_of(role: &TextRoleConfig) -> SheletResult<LineStyle> {
    let fill = Color::from_hex(&role.fill)
        .map_err(|e| SheletError::Config(format!("bad fill color {:?}: {}", role.fill, e)))?;
    Ok(LineStyle {
        fill: fill.to_rgba8(),
        stroke: Color::BLACK.to_rgba8(),
        stroke_width: role.stroke_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelet_core::AssetsConfig;
    use std::path::PathBuf;

    fn find_system_font() -> Option<PathBuf> {
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
        ]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
    }

    /// Identical inputs over an unchanged asset set must produce
    /// pixel-identical canvases. Skips when no system font is available.
    #[test]
    fn test_compose_canvas_is_deterministic() {
        let Some(font) = find_system_font() else {
            eprintln!("skipping: no system font found");
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.png");
        raster::save_png(
            &FrameBuffer::solid(540, 960, &shelet_core::Color::BLACK),
            &template,
        )
        .unwrap();

        let mut config = EngineConfig::default();
        config.canvas.width = 540;
        config.canvas.height = 960;
        config.banner.top = 175;
        config.banner.height = 200;
        config.headline.offset_y = 40;
        config.body.offset_y = 75;
        config.body.bottom_margin = 20;
        config.assets = AssetsConfig {
            template,
            font_bold: font.clone(),
            font_regular: font,
            emoji_font: None,
        };

        let assets = EngineAssets::load(config).unwrap();
        let compositor = OverlayCompositor::new(&assets);

        let a = compositor.compose_canvas("שלום עולם 🙂", "בדיקה ראשונה\nbody line").unwrap();
        let b = compositor.compose_canvas("שלום עולם 🙂", "בדיקה ראשונה\nbody line").unwrap();
        assert_eq!(a, b);
        // Text actually landed on the canvas.
        assert_ne!(a, assets.template);
    }

    #[test]
    fn test_missing_font_fails_before_any_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EngineConfig::default();
        config.assets = AssetsConfig {
            font_bold: "/nonexistent/font.ttf".into(),
            font_regular: "/nonexistent/font.ttf".into(),
            ..Default::default()
        };
        config.encoder.temp_dir = dir.path().join("temp");

        let result = EngineAssets::load(config);
        assert!(matches!(result, Err(SheletError::Asset { .. })));
        // No temp artifact may exist after a failed init.
        assert!(!dir.path().join("temp").exists());
    }

    #[test]
    fn test_style_of_rejects_bad_hex() {
        let mut role = EngineConfig::default().headline;
        role.fill = "#nothex".to_string();
        assert!(style_of(&role).is_err());
    }

    #[test]
    fn test_style_of_default_roles() {
        let cfg = EngineConfig::default();
        let headline = style_of(&cfg.headline).unwrap();
        let body = style_of(&cfg.body).unwrap();
        assert_eq!(headline.fill, [255, 255, 255, 255]);
        assert_eq!(body.fill, [240, 240, 240, 255]);
        // Headline and body carry different stroke widths.
        assert!(headline.stroke_width > body.stroke_width);
    }
}
