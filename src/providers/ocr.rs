//! Placeholder OCR collaborator for setups without a text engine

use super::types::{OcrBox, OcrLine, OcrProvider};
use crate::error::{LocatorError, LocatorResult};
use image::RgbImage;

/// Reports every recognition request as an OCR failure.
///
/// Text lookups against it degrade to "not found" after the locator's retries.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableOcr;

impl OcrProvider for UnavailableOcr {
    fn recognize_lines(&mut self, _image: &RgbImage) -> LocatorResult<Vec<OcrBox>> {
        Err(LocatorError::ocr("no OCR engine configured"))
    }

    fn recognize_single_line(
        &mut self,
        _image: &RgbImage,
        _disallowed: Option<&str>,
    ) -> LocatorResult<Option<Vec<OcrLine>>> {
        Err(LocatorError::ocr("no OCR engine configured"))
    }
}
