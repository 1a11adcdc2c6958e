//! # shelet-core
//!
//! Core types and primitives for the Shelet overlay compositing engine.
//! This crate contains foundational types shared across all Shelet crates:
//! frame buffers, colors, engine configuration, and error types.

pub mod color;
pub mod config;
pub mod error;
pub mod frame;

pub use config::*;

pub use color::Color;
pub use error::{SheletError, SheletResult};
pub use frame::FrameBuffer;
