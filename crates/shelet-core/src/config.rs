//! Engine configuration.
//!
//! Constructed once (from defaults or a `shelet.toml` profile), immutable
//! thereafter, and passed by reference into every pipeline invocation.
//! There are no global singletons.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{SheletError, SheletResult};

/// Final canvas dimensions of the rendered video.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
        }
    }
}

/// Paths to the fixed assets loaded once at engine start.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// Full-canvas background artwork (the pre-made banner template).
    pub template: PathBuf,
    /// Headline font.
    pub font_bold: PathBuf,
    /// Body font. May be the same file as the headline font.
    pub font_regular: PathBuf,
    /// Optional dedicated emoji glyph font, first entry of the fallback chain.
    pub emoji_font: Option<PathBuf>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from("assets/overlay_template.png"),
            font_bold: PathBuf::from("assets/fonts/Rubik-Bold.ttf"),
            font_regular: PathBuf::from("assets/fonts/Rubik-Bold.ttf"),
            emoji_font: None,
        }
    }
}

/// Geometry of the banner artwork region within the canvas.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BannerConfig {
    /// Y coordinate of the banner's top edge on the canvas.
    pub top: i32,
    /// Height of the banner artwork region.
    pub height: i32,
    /// The main clip's top edge may never sit above this line.
    pub safe_y: i32,
    /// Height of the black exclusion rectangle painted behind the banner.
    pub mask_height: u32,
    /// Fraction of the canvas width usable by text.
    pub safe_width_fraction: f32,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            top: 350,
            height: 400,
            safe_y: 770,
            mask_height: 420,
            safe_width_fraction: 0.8,
        }
    }
}

/// Auto-fit and styling parameters for one text role.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextRoleConfig {
    pub start_size: u32,
    pub min_size: u32,
    pub step: u32,
    /// Extra pixels added between stacked lines.
    pub leading: u32,
    /// Vertical offset of the role's slot relative to the banner top.
    pub offset_y: i32,
    /// Distance kept between the last body line and the banner bottom.
    pub bottom_margin: i32,
    pub stroke_width: u32,
    /// Fill color as a hex string.
    pub fill: String,
    pub shadow_blur: f32,
    /// Pixel offsets at which the blurred shadow is pasted, in order.
    pub shadow_offsets: Vec<[i32; 2]>,
}

impl TextRoleConfig {
    fn headline() -> Self {
        Self {
            start_size: 105,
            min_size: 40,
            step: 5,
            leading: 4,
            offset_y: 80,
            bottom_margin: 0,
            stroke_width: 3,
            fill: "#ffffff".to_string(),
            shadow_blur: 2.0,
            shadow_offsets: vec![[4, 4], [8, 8]],
        }
    }

    fn body() -> Self {
        Self {
            start_size: 60,
            min_size: 25,
            step: 2,
            leading: 4,
            offset_y: 150,
            bottom_margin: 45,
            stroke_width: 2,
            fill: "#f0f0f0".to_string(),
            shadow_blur: 2.0,
            shadow_offsets: vec![[2, 2]],
        }
    }
}

/// Video layout planning constants.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutConfig {
    /// Pixels cropped from the clip's top edge in `lower` mode (native
    /// short-form UI region).
    pub top_crop: u32,
    /// The top crop is skipped unless the remaining height exceeds
    /// `top_crop + crop_margin`.
    pub crop_margin: u32,
    /// A banner-overlap re-crop is skipped unless the remaining height
    /// exceeds the overlap by this margin.
    pub recrop_margin: u32,
    /// Target center Y of the main clip in `lower` mode.
    pub lower_center_y: i32,
    /// Downward bias of the filler band crop within the processed source.
    pub filler_band_bias: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            top_crop: 180,
            crop_margin: 100,
            recrop_margin: 50,
            lower_center_y: 1250,
            filler_band_bias: 300,
        }
    }
}

/// External transcoding engine parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncoderConfig {
    pub video_bitrate: String,
    pub preset: String,
    pub pixel_format: String,
    /// Timestamp/tempo scale of the anti-fingerprint chain. 1.0 disables
    /// the stretch and preserves the source duration exactly.
    pub tempo: f64,
    pub output_dir: PathBuf,
    pub temp_dir: PathBuf,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            video_bitrate: "2500k".to_string(),
            preset: "medium".to_string(),
            pixel_format: "yuv420p".to_string(),
            tempo: 1.05,
            output_dir: PathBuf::from("output"),
            temp_dir: PathBuf::from("temp"),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// True when the deployment's renderer performs complex text layout
    /// natively; false selects explicit visual reordering.
    #[serde(default)]
    pub complex_layout: bool,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub banner: BannerConfig,
    #[serde(default = "TextRoleConfig::headline")]
    pub headline: TextRoleConfig,
    #[serde(default = "TextRoleConfig::body")]
    pub body: TextRoleConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub encoder: EncoderConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            complex_layout: false,
            canvas: CanvasConfig::default(),
            assets: AssetsConfig::default(),
            banner: BannerConfig::default(),
            headline: TextRoleConfig::headline(),
            body: TextRoleConfig::body(),
            layout: LayoutConfig::default(),
            encoder: EncoderConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn load_from_file(path: &std::path::Path) -> SheletResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&contents)
            .map_err(|e| SheletError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_consistent() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.canvas.width % 2, 0);
        assert_eq!(cfg.canvas.height % 2, 0);
        // The safe line sits below the banner artwork.
        assert!(cfg.banner.safe_y >= cfg.banner.top + cfg.banner.height);
        assert!(cfg.headline.min_size < cfg.headline.start_size);
        assert!(cfg.body.min_size < cfg.body.start_size);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: EngineConfig = toml::from_str(
            r#"
            [canvas]
            width = 720
            height = 1280
            "#,
        )
        .unwrap();
        assert_eq!(cfg.canvas.width, 720);
        assert_eq!(cfg.banner.top, 350);
        assert_eq!(cfg.body.start_size, 60);
        assert!(!cfg.complex_layout);
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = EngineConfig::load_from_file(std::path::Path::new("/nonexistent/shelet.toml"));
        assert!(result.is_err());
    }
}
