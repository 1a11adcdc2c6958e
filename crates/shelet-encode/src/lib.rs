//! # shelet-encode
//!
//! The video half of the Shelet engine: probes the source clip, plans its
//! crop/scale/placement around the banner exclusion zone, assembles the
//! filter graph, and drives the external ffmpeg invocation.

pub mod ffmpeg;
pub mod graph;
pub mod layout;
pub mod probe;

pub use ffmpeg::Transcoder;
pub use graph::{build_graph, FilterGraph, FilterNode};
pub use layout::{plan, LayoutMode, LayoutPlan};
pub use probe::{probe_source, SourceInfo};
