//! Drop shadow generation.
//!
//! A layer's shadow is its alpha channel painted solid black and
//! Gaussian-blurred. Shadows are derived per layer and pasted before their
//! layer; the headline and body never share one.

use shelet_core::FrameBuffer;

use crate::raster;

/// Derive a blurred black shadow from a layer's alpha channel.
/// Returns None for a layer with no visible pixels.
pub fn shadow_of(layer: &FrameBuffer, blur_sigma: f32) -> Option<FrameBuffer> {
    layer.bounding_box()?;
    Some(raster::gaussian_blur(&layer.silhouette(), blur_sigma))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_layer_has_no_shadow() {
        let layer = FrameBuffer::new(16, 16);
        assert!(shadow_of(&layer, 2.0).is_none());
    }

    #[test]
    fn test_shadow_is_black_and_blurred() {
        let mut layer = FrameBuffer::new(16, 16);
        layer.set_pixel(8, 8, [255, 255, 255, 255]);

        let shadow = shadow_of(&layer, 2.0).unwrap();
        let center = shadow.get_pixel(8, 8).unwrap();
        assert_eq!(&center[..3], &[0, 0, 0]);
        // Blur pushed alpha into the neighborhood.
        assert!(shadow.get_pixel(10, 8).unwrap()[3] > 0);
    }

    #[test]
    fn test_shadow_is_deterministic() {
        let mut layer = FrameBuffer::new(16, 16);
        layer.set_pixel(4, 4, [200, 10, 10, 180]);
        let a = shadow_of(&layer, 1.5).unwrap();
        let b = shadow_of(&layer, 1.5).unwrap();
        assert_eq!(a, b);
    }
}
