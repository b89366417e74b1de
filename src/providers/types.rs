// Collaborator contracts: screenshots, OCR and input injection
use crate::automation::types::{BoundingRegion, CropRect, Point};
use crate::error::LocatorResult;
use image::{GrayImage, RgbImage};
use serde::Serialize;
use std::time::Duration;

/// A snapshot of a screen area together with the screen position it was taken at
#[derive(Debug, Clone)]
pub struct Capture {
    pub image: RgbImage,
    pub origin: Point,
}

impl Capture {
    pub fn new(image: RgbImage, origin: Point) -> Self {
        Self { image, origin }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn to_gray(&self) -> GrayImage {
        image::imageops::grayscale(&self.image)
    }

    /// Convert a capture-local point to screen coordinates
    pub fn to_screen(&self, local: Point) -> Point {
        local.offset(self.origin.x, self.origin.y)
    }

    /// Crop a region given in screen coordinates.
    ///
    /// The region is clipped to the capture; `None` when nothing is left.
    pub fn crop_screen_region(&self, region: &BoundingRegion) -> Option<RgbImage> {
        let local = region.translate(-self.origin.x, -self.origin.y);

        let left = local.top_left.x.clamp(0, self.width() as i32) as u32;
        let top = local.top_left.y.clamp(0, self.height() as i32) as u32;
        let right = local.bottom_right.x.clamp(0, self.width() as i32) as u32;
        let bottom = local.bottom_right.y.clamp(0, self.height() as i32) as u32;
        if right <= left || bottom <= top {
            return None;
        }

        let cropped =
            image::imageops::crop_imm(&self.image, left, top, right - left, bottom - top);
        Some(cropped.to_image())
    }
}

/// A recognised text span from a full-frame OCR pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrBox {
    /// Corners in capture-local pixels: top-left, top-right, bottom-right, bottom-left
    pub quad: [Point; 4],
    pub text: String,
    pub confidence: f32,
}

impl OcrBox {
    pub fn new(quad: [Point; 4], text: impl Into<String>, confidence: f32) -> Self {
        Self {
            quad,
            text: text.into(),
            confidence,
        }
    }

    /// Axis-aligned box from a top-left and bottom-right corner
    pub fn from_rect(
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
        text: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self::new(
            [
                Point::new(left, top),
                Point::new(right, top),
                Point::new(right, bottom),
                Point::new(left, bottom),
            ],
            text,
            confidence,
        )
    }

    /// The diagonal formed by the first and third corner
    pub fn diagonal(&self) -> (Point, Point) {
        (self.quad[0], self.quad[2])
    }
}

/// One line of a focused single-line OCR read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrLine {
    pub text: String,
    pub confidence: f32,
}

impl OcrLine {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// Source of screen captures
pub trait ScreenshotProvider {
    /// Capture part of a window. `None` means the window was not found or
    /// the capture failed; it is not an error.
    fn capture(&mut self, window: &str, crop: CropRect) -> Option<Capture>;
}

/// Text recognition engine
pub trait OcrProvider {
    /// Full-frame, multi-line recognition
    fn recognize_lines(&mut self, image: &RgbImage) -> LocatorResult<Vec<OcrBox>>;

    /// Focused read of a single line, ignoring any character in `disallowed`
    fn recognize_single_line(
        &mut self,
        image: &RgbImage,
        disallowed: Option<&str>,
    ) -> LocatorResult<Option<Vec<OcrLine>>>;
}

/// Synthetic input delivery. Fire-and-forget: nothing is reported back.
pub trait InputProvider {
    fn click(&mut self, x: i32, y: i32);
    fn scroll(&mut self, steps: i32);
    fn press_key(&mut self, key: &str, hold: Duration);
    fn press_mouse(&mut self, hold: Duration);
}
