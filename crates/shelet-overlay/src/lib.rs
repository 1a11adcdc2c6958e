//! # shelet-overlay
//!
//! The layered overlay compositor. Fits headline and body text into the
//! banner region of the background artwork, draws them with stroke and
//! drop shadows onto separate transparent layers, and produces the single
//! RGBA overlay artifact consumed by the filter graph builder.

pub mod compositor;
pub mod emoji;
pub mod glyphs;
pub mod raster;
pub mod shadow;

pub use compositor::{EngineAssets, OverlayCompositor};
pub use emoji::{EmojiChain, EmojiGlyphSource, FontGlyphSource, TofuGlyphSource};
