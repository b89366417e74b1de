//! Reading text next to a located anchor
//!
//! The reading area is described relative to the anchor's size, so the same
//! layout keeps working when the window moves or the UI is rescaled.

use super::session::Automation;
use super::types::{BoundingRegion, FindKind, FindOptions, RelativeOffset};
use crate::providers::{InputProvider, OcrProvider, ScreenshotProvider};

impl<S, O, I> Automation<S, O, I>
where
    S: ScreenshotProvider,
    O: OcrProvider,
    I: InputProvider,
{
    /// Find an image anchor and OCR a single line in the area around it.
    ///
    /// Returns the first recognised line, or `None` when the anchor is not
    /// found, the area is outside the capture or OCR reads nothing.
    pub fn read_text_in_region(
        &mut self,
        template_path: &str,
        offset: &RelativeOffset,
        threshold: Option<f32>,
        disallowed_chars: Option<&str>,
    ) -> Option<String> {
        let options = FindOptions {
            threshold,
            ..FindOptions::default()
        };

        let anchor = self.find_element(template_path, FindKind::Image, &options)?;
        self.read_single_line(&anchor, offset, disallowed_chars)
            .map(|(_, text)| text)
    }

    /// Find a text anchor, OCR the area around it and click the area's centre
    /// only if the text read there equals `expected_text`.
    pub fn click_if_text_matches(
        &mut self,
        text_target: &str,
        offset: &RelativeOffset,
        max_retries: u32,
        disallowed_chars: Option<&str>,
        expected_text: &str,
        include_substring: bool,
    ) -> bool {
        let options = FindOptions::default()
            .max_retries(max_retries)
            .include_substring(include_substring);

        let Some(anchor) = self.find_element(text_target, FindKind::Text, &options) else {
            return false;
        };
        let Some((area, text)) = self.read_single_line(&anchor, offset, disallowed_chars) else {
            return false;
        };

        if text != expected_text {
            log::debug!("Read '{}' next to '{}', wanted '{}'", text, text_target, expected_text);
            return false;
        }

        let center = area.center();
        self.input.click(center.x, center.y);
        true
    }

    /// OCR the area `offset` describes around `anchor` in the current capture
    fn read_single_line(
        &mut self,
        anchor: &BoundingRegion,
        offset: &RelativeOffset,
        disallowed_chars: Option<&str>,
    ) -> Option<(BoundingRegion, String)> {
        let area = offset.apply(anchor);
        let capture = self.capture.as_ref()?;

        let Some(cropped) = capture.crop_screen_region(&area) else {
            log::debug!("Reading area {:?} lies outside the capture", area);
            return None;
        };

        match self.ocr.recognize_single_line(&cropped, disallowed_chars) {
            Ok(lines) => {
                log::debug!("OCR result: {:?}", lines);
                let line = lines?.into_iter().next()?;
                Some((area, line.text))
            }
            Err(e) => {
                log::error!("❌ Reading text in {:?} failed: {}", area, e);
                None
            }
        }
    }
}
