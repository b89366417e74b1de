// Geometry and request types for element resolution
use crate::error::LocatorError;
use crate::template_matching::ScaleRange;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A point in screen (or capture-local) pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Extent of a found element in absolute screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingRegion {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl BoundingRegion {
    pub fn new(top_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    pub fn width(&self) -> i32 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> i32 {
        self.bottom_right.y - self.top_left.y
    }

    /// Centre point, rounding towards negative infinity
    pub fn center(&self) -> Point {
        Point::new(
            (self.top_left.x + self.bottom_right.x).div_euclid(2),
            (self.top_left.y + self.bottom_right.y).div_euclid(2),
        )
    }

    /// Shift both corners by the same amount
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.top_left.offset(dx, dy), self.bottom_right.offset(dx, dy))
    }
}

/// Part of the target window to capture, as fractions of its size.
///
/// All zeros means the whole window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub const FULL: CropRect = CropRect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }
}

/// How a target is recognised in a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindKind {
    /// Target is a path to a template image
    Image,
    /// Target is a string recognised by OCR
    Text,
}

impl FromStr for FindKind {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(FindKind::Image),
            "text" => Ok(FindKind::Text),
            other => Err(LocatorError::UnknownKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// Knobs for a single `find_element` call
#[derive(Debug, Clone, PartialEq)]
pub struct FindOptions {
    /// Minimum score for image matches; `None` accepts the best candidate
    pub threshold: Option<f32>,
    /// Capture+match cycles to attempt
    pub max_retries: u32,
    /// Refresh the capture before each attempt
    pub capture_first: bool,
    pub scale_range: Option<ScaleRange>,
    pub crop: CropRect,
    /// Text matches when the target is a substring instead of the whole box text
    pub include_substring: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            threshold: None,
            max_retries: 1,
            capture_first: true,
            scale_range: None,
            crop: CropRect::FULL,
            include_substring: false,
        }
    }
}

impl FindOptions {
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn capture_first(mut self, capture_first: bool) -> Self {
        self.capture_first = capture_first;
        self
    }

    pub fn scale_range(mut self, range: ScaleRange) -> Self {
        self.scale_range = Some(range);
        self
    }

    pub fn crop(mut self, crop: CropRect) -> Self {
        self.crop = crop;
        self
    }

    pub fn include_substring(mut self, include: bool) -> Self {
        self.include_substring = include;
        self
    }

    /// Number of attempts actually made; without a fresh capture every
    /// attempt would see the same pixels, so only one is made.
    pub fn effective_retries(&self) -> u32 {
        if self.capture_first { self.max_retries } else { 1 }
    }
}

/// Reading area expressed relative to an anchor region.
///
/// Each fraction is multiplied by the anchor's width (x) or height (y) and
/// added to the matching anchor corner, so `top_left` moves the anchor's
/// top-left corner and `bottom_right` moves its bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RelativeOffset {
    pub top_left: (f64, f64),
    pub bottom_right: (f64, f64),
}

impl RelativeOffset {
    pub fn new(top_left: (f64, f64), bottom_right: (f64, f64)) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Absolute sub-rectangle for this offset around `anchor`, rounded to whole pixels
    pub fn apply(&self, anchor: &BoundingRegion) -> BoundingRegion {
        let width = anchor.width() as f64;
        let height = anchor.height() as f64;

        let left = anchor.top_left.x as f64 + width * self.top_left.0;
        let top = anchor.top_left.y as f64 + height * self.top_left.1;
        let right = anchor.bottom_right.x as f64 + width * self.bottom_right.0;
        let bottom = anchor.bottom_right.y as f64 + height * self.bottom_right.1;

        BoundingRegion::new(
            Point::new(left.round() as i32, top.round() as i32),
            Point::new(right.round() as i32, bottom.round() as i32),
        )
    }
}
