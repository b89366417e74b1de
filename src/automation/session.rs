// Automation session: owns the collaborators and the most recent capture
use super::config::LocatorConfig;
use super::types::{BoundingRegion, CropRect, FindKind, FindOptions, Point};
use crate::error::LocatorResult;
use crate::providers::{Capture, InputProvider, OcrProvider, ScreenshotProvider};
use crate::template_matching::{ScaleRange, Template, TemplateMatcher};
use std::thread::sleep;
use std::time::Duration;

/// One automation target (window) with its own capture state.
///
/// Sessions are independent: each holds its own providers and capture, so
/// several windows can be driven side by side. A session itself is meant to
/// be used from a single driver thread.
pub struct Automation<S, O, I> {
    pub(crate) config: LocatorConfig,
    pub(crate) matcher: TemplateMatcher,
    pub(crate) screenshot: S,
    pub(crate) ocr: O,
    pub(crate) input: I,
    pub(crate) capture: Option<Capture>,
}

impl<S, O, I> Automation<S, O, I>
where
    S: ScreenshotProvider,
    O: OcrProvider,
    I: InputProvider,
{
    pub fn new(config: LocatorConfig, screenshot: S, ocr: O, input: I) -> Self {
        let matcher = TemplateMatcher::new(config.method, config.scale_step);
        Self {
            config,
            matcher,
            screenshot,
            ocr,
            input,
            capture: None,
        }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// The capture the last lookup ran against
    pub fn capture(&self) -> Option<&Capture> {
        self.capture.as_ref()
    }

    pub fn screenshot_provider(&self) -> &S {
        &self.screenshot
    }

    pub fn ocr_provider(&self) -> &O {
        &self.ocr
    }

    pub fn input_provider(&self) -> &I {
        &self.input
    }

    /// Replace the session capture with a fresh one.
    ///
    /// On failure the previous capture is kept and `false` is returned.
    pub fn take_screenshot(&mut self, crop: CropRect) -> bool {
        match self.screenshot.capture(&self.config.window_title, crop) {
            Some(capture) => {
                self.capture = Some(capture);
                true
            }
            None => {
                log::debug!("📸 Capture of '{}' failed", self.config.window_title);
                false
            }
        }
    }

    /// Locate `target` and return its extent in screen coordinates.
    ///
    /// Runs up to `options.max_retries` capture+match cycles (exactly one
    /// when `capture_first` is off). Template and OCR failures are logged and
    /// count as a miss, so persistent failures end up as `None`.
    pub fn find_element(
        &mut self,
        target: &str,
        kind: FindKind,
        options: &FindOptions,
    ) -> Option<BoundingRegion> {
        let max_retries = options.effective_retries();
        let threshold = options.threshold.or(self.config.default_threshold);

        for attempt in 1..=max_retries {
            if options.capture_first && !self.take_screenshot(options.crop) {
                continue;
            }

            let found = match kind {
                FindKind::Image => self.find_image_element(target, threshold, options.scale_range),
                FindKind::Text => self.find_text_element(target, options.include_substring),
            };

            match found {
                Ok(Some(region)) => return Some(region),
                Ok(None) => {}
                Err(e) => log::error!("❌ Looking for {:?} '{}' failed: {}", kind, target, e),
            }

            if attempt < max_retries {
                sleep(self.config.retry_backoff);
            }
        }

        None
    }

    /// Same as [`Automation::find_element`] with the kind given by name.
    ///
    /// An unknown kind is a usage error and is returned without any attempt.
    pub fn find_element_by_kind_name(
        &mut self,
        target: &str,
        kind: &str,
        options: &FindOptions,
    ) -> LocatorResult<Option<BoundingRegion>> {
        let kind: FindKind = kind.parse()?;
        Ok(self.find_element(target, kind, options))
    }

    fn find_image_element(
        &self,
        template_path: &str,
        threshold: Option<f32>,
        scale_range: Option<ScaleRange>,
    ) -> LocatorResult<Option<BoundingRegion>> {
        let Some(capture) = &self.capture else {
            log::debug!("No capture to search for '{}'", template_path);
            return Ok(None);
        };

        let template = Template::load(template_path)?;
        let capture_gray = capture.to_gray();
        let Some(best) =
            self.matcher
                .scale_and_match(&capture_gray, &template.image, threshold, scale_range)
        else {
            log::debug!("🔍 Template '{}': no usable location", template.name);
            return Ok(None);
        };

        log::debug!(
            "🔍 Template '{}' score {:.4} at ({},{}) scale {:?}",
            template.name,
            best.score,
            best.x,
            best.y,
            best.scale
        );

        if !best.is_accepted(threshold) {
            return Ok(None);
        }

        let top_left = capture.to_screen(Point::new(best.x as i32, best.y as i32));
        let bottom_right = top_left.offset(best.width as i32, best.height as i32);
        Ok(Some(BoundingRegion::new(top_left, bottom_right)))
    }

    fn find_text_element(
        &mut self,
        target: &str,
        include_substring: bool,
    ) -> LocatorResult<Option<BoundingRegion>> {
        let Some(capture) = &self.capture else {
            log::debug!("No capture to search for text '{}'", target);
            return Ok(None);
        };

        let boxes = self.ocr.recognize_lines(&capture.image)?;
        if boxes.is_empty() {
            log::debug!("🔤 Text '{}' not found: no text recognised", target);
            return Ok(None);
        }

        let Some(hit) = boxes
            .iter()
            .find(|b| text_matches(target, &b.text, include_substring))
        else {
            log::debug!("🔤 Text '{}' not found among {} boxes", target, boxes.len());
            return Ok(None);
        };

        log::debug!("🔤 Text '{}' confidence {:.3}", target, hit.confidence);
        let (a, b) = hit.diagonal();
        Ok(Some(BoundingRegion::new(
            capture.to_screen(a),
            capture.to_screen(b),
        )))
    }

    /// Find an element and click its centre shifted by `offset` pixels
    pub fn click_element(
        &mut self,
        target: &str,
        kind: FindKind,
        options: &FindOptions,
        offset: (i32, i32),
    ) -> bool {
        let Some(region) = self.find_element(target, kind, options) else {
            return false;
        };

        let center = region.center().offset(offset.0, offset.1);
        sleep(self.config.click_delay);
        self.input.click(center.x, center.y);
        true
    }

    pub fn mouse_click(&mut self, x: i32, y: i32) {
        self.input.click(x, y);
    }

    pub fn mouse_scroll(&mut self, steps: i32) {
        self.input.scroll(steps);
    }

    pub fn press_key(&mut self, key: &str, hold: Duration) {
        self.input.press_key(key, hold);
    }

    pub fn press_mouse(&mut self, hold: Duration) {
        self.input.press_mouse(hold);
    }
}

/// Exact match, or substring match when `include_substring` is set
pub fn text_matches(target: &str, text: &str, include_substring: bool) -> bool {
    if include_substring {
        text.contains(target)
    } else {
        text == target
    }
}
