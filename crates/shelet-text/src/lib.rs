//! # shelet-text
//!
//! Text handling for the Shelet overlay engine: splitting mixed
//! Hebrew/Latin/emoji strings into measurable runs, reordering
//! right-to-left content for basic-layout rasterizers, and the auto-fit
//! search that sizes and wraps a block into its banner region.

pub mod fitter;
pub mod font;
pub mod segment;
pub mod shaping;

pub use fitter::{fit_body, fit_headline, FitResult, RoleMeasure, SizeRange, TextMeasure};
pub use font::{FontBook, FontRole};
pub use segment::{segment, RunKind, Segmentation, TextRun};
pub use shaping::{strategy_for, NativeShaping, TextShapingStrategy, VisualReorder};
