//! Video layout planning.
//!
//! Decides crop, scale and vertical placement of the main clip relative to
//! the banner exclusion zone. Every width and height the plan emits is an
//! even integer (chroma subsampling constraint), and the clip's top edge
//! never lands above the banner safe line.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use shelet_core::{EngineConfig, SheletError, SheletResult};

/// How the main clip is placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Scale to canvas width, center vertically.
    Standard,
    /// Crop the native short-form UI strip from the top and pin the clip low.
    Lower,
}

impl FromStr for LayoutMode {
    type Err = SheletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(LayoutMode::Standard),
            "lower" => Ok(LayoutMode::Lower),
            other => Err(SheletError::InvalidArgument(format!(
                "unknown layout mode {:?} (expected \"lower\" or \"standard\")",
                other
            ))),
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::Standard => write!(f, "standard"),
            LayoutMode::Lower => write!(f, "lower"),
        }
    }
}

/// The computed placement of one source clip.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutPlan {
    pub mode: LayoutMode,
    /// Pixels cropped from the scaled clip's top edge.
    pub crop_top: u32,
    /// Y of the clip's top edge on the canvas. Never above `banner_safe_y`.
    pub top_y: i32,
    /// The center the mode aimed the clip at before safety adjustments.
    pub target_center_y: i32,
    pub banner_safe_y: i32,
    pub even_width: u32,
    /// Height of the main clip after cropping.
    pub even_height: u32,
}

fn make_even(n: u32) -> u32 {
    if n % 2 == 0 {
        n
    } else {
        n + 1
    }
}

/// Compute the layout plan for a source clip.
pub fn plan(
    source_width: u32,
    source_height: u32,
    mode: LayoutMode,
    cfg: &EngineConfig,
) -> SheletResult<LayoutPlan> {
    if source_width == 0 || source_height == 0 {
        return Err(SheletError::Graph(format!(
            "source has degenerate dimensions {}x{}",
            source_width, source_height
        )));
    }

    let canvas_w = cfg.canvas.width;
    let canvas_h = cfg.canvas.height as i32;
    let tuning = &cfg.layout;

    // Scale to canvas width, preserving aspect.
    let scaled_h = make_even(
        ((source_height as f64) * (canvas_w as f64) / (source_width as f64)).round() as u32,
    );

    let mut crop_top = 0u32;
    let target_center_y = match mode {
        LayoutMode::Lower => {
            // Skip the native-UI strip, but never crop a tiny clip to death.
            if scaled_h > tuning.top_crop + tuning.crop_margin {
                crop_top = make_even(tuning.top_crop);
            }
            tuning.lower_center_y
        }
        LayoutMode::Standard => canvas_h / 2,
    };

    let mut height = scaled_h - crop_top;
    let mut top_y = target_center_y - (height as i32) / 2;

    // Never let the clip occlude the banner: crop the overlap off the top
    // when there is enough clip left, and pin the top edge at the safe line
    // either way.
    let safe_y = cfg.banner.safe_y;
    if top_y < safe_y {
        let overlap = (safe_y - top_y) as u32;
        if height > overlap + tuning.recrop_margin {
            let extra = make_even(overlap);
            crop_top += extra;
            height -= extra;
        }
        top_y = safe_y;
    }

    if height == 0 {
        return Err(SheletError::Graph(
            "layout plan produced a zero-height clip".to_string(),
        ));
    }

    let plan = LayoutPlan {
        mode,
        crop_top,
        top_y,
        target_center_y,
        banner_safe_y: safe_y,
        even_width: make_even(canvas_w),
        even_height: height,
    };
    tracing::debug!(?plan, "layout planned");
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(LayoutMode::from_str("lower").unwrap(), LayoutMode::Lower);
        assert_eq!(
            LayoutMode::from_str("standard").unwrap(),
            LayoutMode::Standard
        );
        assert!(LayoutMode::from_str("sideways").is_err());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            plan(0, 1080, LayoutMode::Standard, &cfg()),
            Err(SheletError::Graph(_))
        ));
    }

    #[test]
    fn test_dimensions_always_even() {
        for (w, h) in [(1920, 1080), (1279, 717), (854, 481), (405, 719), (333, 241)] {
            for mode in [LayoutMode::Standard, LayoutMode::Lower] {
                let p = plan(w, h, mode, &cfg()).unwrap();
                assert_eq!(p.even_width % 2, 0, "{}x{} {:?}", w, h, mode);
                assert_eq!(p.even_height % 2, 0, "{}x{} {:?}", w, h, mode);
                assert_eq!(p.crop_top % 2, 0, "{}x{} {:?}", w, h, mode);
            }
        }
    }

    #[test]
    fn test_top_never_above_banner_safe_line() {
        for (w, h) in [(1920, 1080), (1080, 1920), (640, 480), (720, 1280)] {
            for mode in [LayoutMode::Standard, LayoutMode::Lower] {
                let p = plan(w, h, mode, &cfg()).unwrap();
                assert!(
                    p.top_y >= p.banner_safe_y,
                    "{}x{} {:?}: top {} above {}",
                    w,
                    h,
                    mode,
                    p.top_y,
                    p.banner_safe_y
                );
            }
        }
    }

    #[test]
    fn test_lower_mode_crops_native_ui_strip() {
        // A tall clip: 1080x1920 scales 1:1, well above the crop threshold.
        let p = plan(1080, 1920, LayoutMode::Lower, &cfg()).unwrap();
        assert!(p.crop_top >= 180);
        assert_eq!(p.target_center_y, 1250);
    }

    #[test]
    fn test_lower_mode_short_source_not_cropped() {
        // Scaled height 200 is under top_crop + crop_margin: no UI crop,
        // and the placement still clears the banner.
        let p = plan(1080, 200, LayoutMode::Lower, &cfg()).unwrap();
        assert_eq!(p.crop_top, 0);
        assert_eq!(p.even_height, 200);
        assert!(p.top_y >= p.banner_safe_y);
    }

    #[test]
    fn test_standard_mode_centers_when_it_fits() {
        // Scaled height 200 centered at 960 → top 860, below the safe line.
        let p = plan(1080, 200, LayoutMode::Standard, &cfg()).unwrap();
        assert_eq!(p.crop_top, 0);
        assert_eq!(p.top_y, 860);
    }

    #[test]
    fn test_standard_mode_tall_clip_repinned_to_safe_line() {
        let p = plan(1080, 1920, LayoutMode::Standard, &cfg()).unwrap();
        assert_eq!(p.top_y, p.banner_safe_y);
        assert!(p.crop_top > 0);
    }

    #[test]
    fn test_overlap_recrop_preserves_geometry() {
        let p = plan(1080, 1920, LayoutMode::Lower, &cfg()).unwrap();
        // Total consumed height never exceeds the scaled clip.
        assert!(p.crop_top + p.even_height <= 1920);
        assert_eq!(p.top_y, p.banner_safe_y);
    }

    #[test]
    fn test_too_short_to_recrop_still_pins() {
        // Height 60 centered at 780 puts the top at 750: a 20 px overlap,
        // but 60 ≤ 20 + recrop_margin, so the clip is pinned without a crop.
        let mut tiny = cfg();
        tiny.layout.lower_center_y = 780;
        let p = plan(1080, 60, LayoutMode::Lower, &tiny).unwrap();
        assert_eq!(p.crop_top, 0);
        assert_eq!(p.even_height, 60);
        assert_eq!(p.top_y, p.banner_safe_y);
    }
}
