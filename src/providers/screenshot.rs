//! Screenshot provider backed by a stored image instead of a live screen

use super::types::{Capture, ScreenshotProvider};
use crate::automation::types::{CropRect, Point};
use image::RgbImage;
use std::path::PathBuf;

enum Source {
    File(PathBuf),
    Memory(RgbImage),
}

/// Serves captures from an image file (re-read on every capture) or an
/// in-memory image, positioned at a fixed screen origin.
pub struct ImageScreenshot {
    source: Source,
    origin: Point,
    count: u64,
}

impl ImageScreenshot {
    pub fn from_file(path: impl Into<PathBuf>, origin: Point) -> Self {
        Self {
            source: Source::File(path.into()),
            origin,
            count: 0,
        }
    }

    pub fn from_image(image: RgbImage, origin: Point) -> Self {
        Self {
            source: Source::Memory(image),
            origin,
            count: 0,
        }
    }

    /// Number of captures served so far
    pub fn capture_count(&self) -> u64 {
        self.count
    }

    fn load(&self) -> Option<RgbImage> {
        match &self.source {
            Source::File(path) => match image::open(path) {
                Ok(img) => Some(img.to_rgb8()),
                Err(e) => {
                    log::warn!("Failed to read capture source {}: {}", path.display(), e);
                    None
                }
            },
            Source::Memory(img) => Some(img.clone()),
        }
    }
}

impl ScreenshotProvider for ImageScreenshot {
    fn capture(&mut self, window: &str, crop: CropRect) -> Option<Capture> {
        let image = self.load()?;
        self.count += 1;

        if crop.is_full() {
            log::debug!(
                "Capture #{} of '{}': {}x{} at ({},{})",
                self.count,
                window,
                image.width(),
                image.height(),
                self.origin.x,
                self.origin.y
            );
            return Some(Capture::new(image, self.origin));
        }

        let (w, h) = (image.width() as f64, image.height() as f64);
        let x = (crop.x * w).round().clamp(0.0, w) as u32;
        let y = (crop.y * h).round().clamp(0.0, h) as u32;
        let cw = ((crop.width * w).round() as u32).min(image.width() - x);
        let ch = ((crop.height * h).round() as u32).min(image.height() - y);
        if cw == 0 || ch == 0 {
            log::warn!("Crop {:?} leaves an empty capture of '{}'", crop, window);
            return None;
        }

        let cropped = image::imageops::crop_imm(&image, x, y, cw, ch).to_image();
        Some(Capture::new(
            cropped,
            self.origin.offset(x as i32, y as i32),
        ))
    }
}
