//! Bridging between engine frame buffers and the `image` crate.
//!
//! Template decode, Lanczos resizing, Gaussian blur and PNG encoding all go
//! through `image`; everything else in the compositor works on raw
//! [`FrameBuffer`]s.

use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;

use shelet_core::{FrameBuffer, SheletError, SheletResult};

/// Load the background template artwork, resized to the exact canvas size.
pub fn load_template(path: &Path, width: u32, height: u32) -> SheletResult<FrameBuffer> {
    let img = image::open(path).map_err(|e| {
        SheletError::asset(format!("failed to load template image: {}", e), path)
    })?;
    let rgba = img.to_rgba8();
    let rgba = if rgba.dimensions() == (width, height) {
        rgba
    } else {
        image::imageops::resize(&rgba, width, height, FilterType::Lanczos3)
    };
    Ok(frame_from_image(rgba))
}

/// Wrap a decoded RGBA image into a frame buffer.
pub fn frame_from_image(img: RgbaImage) -> FrameBuffer {
    let (width, height) = img.dimensions();
    let mut fb = FrameBuffer::new(width, height);
    fb.data = img.into_raw();
    fb
}

/// View a frame buffer as an RGBA image (copies the pixel data).
pub fn image_from_frame(fb: &FrameBuffer) -> RgbaImage {
    RgbaImage::from_raw(fb.width, fb.height, fb.data.clone())
        .expect("frame buffer data length must match its dimensions")
}

/// Gaussian-blur a frame buffer.
pub fn gaussian_blur(fb: &FrameBuffer, sigma: f32) -> FrameBuffer {
    frame_from_image(image::imageops::blur(&image_from_frame(fb), sigma))
}

/// Encode a frame buffer as an RGBA PNG.
pub fn save_png(fb: &FrameBuffer, path: &Path) -> SheletResult<()> {
    image_from_frame(fb)
        .save(path)
        .map_err(|e| SheletError::Render(format!("failed to save {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelet_core::Color;

    #[test]
    fn test_frame_image_roundtrip() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.set_pixel(1, 2, [10, 20, 30, 40]);
        let back = frame_from_image(image_from_frame(&fb));
        assert_eq!(back, fb);
    }

    #[test]
    fn test_save_and_reload_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.png");
        let fb = FrameBuffer::solid(8, 8, &Color::WHITE);
        save_png(&fb, &path).unwrap();

        let loaded = load_template(&path, 8, 8).unwrap();
        assert_eq!(loaded, fb);
    }

    #[test]
    fn test_load_template_resizes_to_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.png");
        save_png(&FrameBuffer::solid(16, 16, &Color::BLACK), &path).unwrap();

        let loaded = load_template(&path, 8, 4).unwrap();
        assert_eq!((loaded.width, loaded.height), (8, 4));
    }

    #[test]
    fn test_load_template_missing_is_asset_error() {
        let result = load_template(Path::new("/nonexistent/template.png"), 10, 10);
        assert!(matches!(result, Err(SheletError::Asset { .. })));
    }

    #[test]
    fn test_gaussian_blur_spreads_alpha() {
        let mut fb = FrameBuffer::new(16, 16);
        fb.set_pixel(8, 8, [0, 0, 0, 255]);
        let blurred = gaussian_blur(&fb, 2.0);
        // Neighboring pixels pick up alpha from the blurred point.
        assert!(blurred.get_pixel(9, 8).unwrap()[3] > 0);
        assert!(blurred.get_pixel(8, 8).unwrap()[3] < 255);
    }
}
