/// Template matching data types
use crate::error::{LocatorError, LocatorResult};
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Correlation measure used to score template positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchMethod {
    /// Zero-mean normalized cross-correlation, scores in [-1, 1]
    #[default]
    CoefficientNormalized,
    /// Plain normalized cross-correlation as computed by imageproc, scores in [0, 1]
    CrossCorrelationNormalized,
}

impl FromStr for MatchMethod {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ccoeff" | "ccoeff_normed" | "coefficient" => Ok(MatchMethod::CoefficientNormalized),
            "ccorr" | "ccorr_normed" | "cross" => Ok(MatchMethod::CrossCorrelationNormalized),
            other => Err(LocatorError::InvalidArgument {
                description: format!("unknown match method '{other}'"),
            }),
        }
    }
}

/// Half-open interval of template resize factors, `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
}

impl ScaleRange {
    pub fn new(min: f64, max: f64) -> LocatorResult<Self> {
        if !(min > 0.0 && min < max && max.is_finite()) {
            return Err(LocatorError::InvalidScaleRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Scale factors sampled from `min` up to but excluding `max`.
    ///
    /// The sample count is `ceil((max - min) / step)` and each sample is
    /// `min + i * step`, so floating point drift near `max` behaves the same
    /// way as a numeric `arange`.
    pub fn steps(&self, step: f64) -> Vec<f64> {
        if step <= 0.0 || self.max <= self.min {
            return Vec::new();
        }
        let count = ((self.max - self.min) / step).ceil() as usize;
        (0..count).map(|i| self.min + i as f64 * step).collect()
    }
}

/// Best location found for a template in a capture.
///
/// `width` and `height` are the size of the template as it was matched, so a
/// match found at scale 0.5 reports half the template's file dimensions and
/// the bounding region built from it covers what was actually seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Correlation score of the winning position, not clamped
    pub score: f32,
    /// Top-left X in capture-local pixels
    pub x: u32,
    /// Top-left Y in capture-local pixels
    pub y: u32,
    /// Width of the template as matched (after scaling)
    pub width: u32,
    /// Height of the template as matched (after scaling)
    pub height: u32,
    /// Resize factor applied to the template, `None` at original scale
    pub scale: Option<f64>,
}

impl MatchResult {
    /// A result is accepted when it meets the threshold, or unconditionally without one
    pub fn is_accepted(&self, threshold: Option<f32>) -> bool {
        threshold.is_none_or(|t| self.score >= t)
    }

    pub fn top_left(&self) -> (u32, u32) {
        (self.x, self.y)
    }
}

/// A named grayscale reference image
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub path: PathBuf,
    pub image: GrayImage,
}

impl Template {
    /// Decode any supported raster format from disk as grayscale
    pub fn load(path: impl AsRef<Path>) -> LocatorResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| LocatorError::TemplateLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_luma8();

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(Self {
            name,
            path: path.to_path_buf(),
            image,
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Width and height of the template stored at `path`
pub fn template_dimensions(path: impl AsRef<Path>) -> LocatorResult<(u32, u32)> {
    let template = Template::load(path)?;
    Ok((template.width(), template.height()))
}
