/// Template matching module for locating reference images in captures
///
/// This module provides:
/// - Zero-mean normalized cross-correlation maps (and imageproc's plain NCC)
/// - Original-scale matching with a bounded multi-scale fallback
/// - Coarse-to-fine search when a full scan of a large capture is too costly
/// - Grayscale template loading from any supported image format
pub mod correlation;
pub mod matcher;
pub mod pyramid;
pub mod types;

pub use matcher::{DEFAULT_SCALE_STEP, TemplateMatcher};
pub use types::{MatchMethod, MatchResult, ScaleRange, Template, template_dimensions};
