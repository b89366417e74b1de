/// Template matching implementation
///
/// Original-scale matching first, multi-scale search only as a fallback
use super::correlation::correlation_map;
use super::pyramid::{coarse_to_fine, pyramid_levels};
use super::types::{MatchMethod, MatchResult, ScaleRange};
use image::GrayImage;
use image::imageops::FilterType;
use imageproc::template_matching::find_extremes;

/// Default spacing between sampled scale factors
pub const DEFAULT_SCALE_STEP: f64 = 0.1;

/// Finds the best-scoring location of a grayscale template in a grayscale capture
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    method: MatchMethod,
    scale_step: f64,
}

impl TemplateMatcher {
    pub fn new(method: MatchMethod, scale_step: f64) -> Self {
        Self { method, scale_step }
    }

    /// Best-scoring position at a single template size.
    ///
    /// This is the global maximum of the correlation map whenever a full scan
    /// fits [`FULL_SCAN_WORK`](super::pyramid::FULL_SCAN_WORK); larger searches
    /// go coarse-to-fine. Returns `None` when the template does not fit inside
    /// the capture.
    pub fn best_location(
        &self,
        capture: &GrayImage,
        template: &GrayImage,
        scale: Option<f64>,
    ) -> Option<MatchResult> {
        let levels = pyramid_levels(capture.dimensions(), template.dimensions());
        let (score, x, y) = if levels == 0 {
            let map = correlation_map(capture, template, self.method)?;
            let extremes = find_extremes(&map);
            let (x, y) = extremes.max_value_location;
            (extremes.max_value, x, y)
        } else {
            log::debug!(
                "Template {}x{} in {}x{}: coarse-to-fine over {} halvings",
                template.width(),
                template.height(),
                capture.width(),
                capture.height(),
                levels
            );
            coarse_to_fine(capture, template, self.method, levels)?
        };

        Some(MatchResult {
            score,
            x,
            y,
            width: template.width(),
            height: template.height(),
            scale,
        })
    }

    /// Match at original scale, falling back to a scale search.
    ///
    /// # Arguments
    /// * `capture` - The image to search in
    /// * `template` - The reference image to find
    /// * `threshold` - Minimum acceptable score; `None` accepts the original-scale best
    /// * `scale_range` - Resize factors to try when the original scale misses the threshold
    ///
    /// # Returns
    /// The original-scale result when no threshold is given or it is met.
    /// Otherwise the best scaled candidate (which the caller still has to
    /// check against the threshold), or `None` when there is no scale range
    /// or no scaled template fits the capture.
    pub fn scale_and_match(
        &self,
        capture: &GrayImage,
        template: &GrayImage,
        threshold: Option<f32>,
        scale_range: Option<ScaleRange>,
    ) -> Option<MatchResult> {
        let original = self.best_location(capture, template, None);

        let threshold = match (threshold, original) {
            (None, original) => return original,
            (Some(t), Some(original)) if original.score >= t => return Some(original),
            (Some(t), original) => {
                if let Some(original) = &original {
                    log::debug!(
                        "Original scale score {:.4} below threshold {:.4}",
                        original.score,
                        t
                    );
                }
                t
            }
        };

        let range = scale_range?;
        let mut best: Option<MatchResult> = None;

        for scale in range.steps(self.scale_step) {
            let Some(scaled) = resize_template(template, scale) else {
                continue;
            };
            let Some(candidate) = self.best_location(capture, &scaled, Some(scale)) else {
                log::debug!(
                    "Scale {:.2}: template {}x{} does not fit capture {}x{}",
                    scale,
                    scaled.width(),
                    scaled.height(),
                    capture.width(),
                    capture.height()
                );
                continue;
            };

            log::debug!("Scale {:.2}: score {:.4}", scale, candidate.score);
            if best.as_ref().is_none_or(|b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }

        if let Some(best) = &best {
            log::debug!(
                "Best scaled match {:.4} at scale {:?} (threshold {:.4})",
                best.score,
                best.scale,
                threshold
            );
        }
        best
    }
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self::new(MatchMethod::default(), DEFAULT_SCALE_STEP)
    }
}

/// Resample a template by `scale` with bilinear filtering.
///
/// Returns `None` when the scaled size collapses to zero.
fn resize_template(template: &GrayImage, scale: f64) -> Option<GrayImage> {
    let width = (template.width() as f64 * scale).round() as u32;
    let height = (template.height() as f64 * scale).round() as u32;
    if width == 0 || height == 0 {
        return None;
    }
    if (width, height) == template.dimensions() {
        return Some(template.clone());
    }
    Some(image::imageops::resize(
        template,
        width,
        height,
        FilterType::Triangle,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{noise_image, paste, smooth_pattern};

    fn capture_with_patch(x: u32, y: u32) -> (GrayImage, GrayImage) {
        let mut capture = noise_image(80, 60, 11);
        let template = noise_image(14, 10, 12);
        paste(&mut capture, &template, x, y);
        (capture, template)
    }

    #[test]
    fn test_finds_unscaled_template_without_threshold() {
        let (capture, template) = capture_with_patch(33, 41);
        let matcher = TemplateMatcher::default();

        let m = matcher
            .scale_and_match(&capture, &template, None, None)
            .unwrap();

        assert_eq!(m.top_left(), (33, 41));
        assert_eq!((m.width, m.height), (14, 10));
        assert_eq!(m.scale, None);
        assert!(m.score > 0.999);
    }

    #[test]
    fn test_reported_score_is_global_maximum() {
        let (capture, template) = capture_with_patch(5, 7);
        let matcher = TemplateMatcher::default();
        let map = correlation_map(&capture, &template, MatchMethod::CoefficientNormalized).unwrap();
        let m = matcher.best_location(&capture, &template, None).unwrap();

        assert!(map.pixels().all(|p| p[0] <= m.score));
    }

    #[test]
    fn test_threshold_above_best_without_scale_range_is_absent() {
        let capture = noise_image(60, 60, 21);
        let template = noise_image(10, 10, 22);
        let matcher = TemplateMatcher::default();

        let best = matcher.best_location(&capture, &template, None).unwrap();
        let threshold = best.score + 0.05;

        assert!(
            matcher
                .scale_and_match(&capture, &template, Some(threshold), None)
                .is_none()
        );
    }

    #[test]
    fn test_threshold_met_at_original_scale_skips_scale_search() {
        let (capture, template) = capture_with_patch(10, 10);
        let matcher = TemplateMatcher::default();
        let range = ScaleRange::new(0.5, 0.8).unwrap();

        let m = matcher
            .scale_and_match(&capture, &template, Some(0.9), Some(range))
            .unwrap();
        assert_eq!(m.scale, None);
        assert_eq!(m.top_left(), (10, 10));
    }

    #[test]
    fn test_scale_fallback_beats_original_scale() {
        // The capture holds the pattern at half the size of the template
        let mut capture = noise_image(90, 90, 31);
        let small = smooth_pattern(24, 24, 1.0);
        paste(&mut capture, &small, 40, 30);
        let template = smooth_pattern(48, 48, 2.0);

        let matcher = TemplateMatcher::default();
        let original = matcher.best_location(&capture, &template, None).unwrap();
        let threshold = 0.9;
        assert!(original.score < threshold, "original {}", original.score);

        let range = ScaleRange::new(0.5, 0.6).unwrap();
        let m = matcher
            .scale_and_match(&capture, &template, Some(threshold), Some(range))
            .unwrap();

        assert_eq!(m.scale, Some(0.5));
        assert_eq!((m.width, m.height), (24, 24));
        assert!(m.score >= threshold, "scaled score {}", m.score);
        assert!(m.score > original.score);
        assert!(m.x.abs_diff(40) <= 1 && m.y.abs_diff(30) <= 1);
    }

    #[test]
    fn test_template_larger_than_capture_is_absent() {
        let capture = noise_image(20, 20, 41);
        let template = noise_image(30, 10, 42);
        let matcher = TemplateMatcher::default();

        assert!(matcher.scale_and_match(&capture, &template, None, None).is_none());
    }

    #[test]
    fn test_oversized_template_can_still_match_scaled_down() {
        let mut capture = noise_image(40, 40, 51);
        let small = smooth_pattern(20, 20, 1.0);
        paste(&mut capture, &small, 10, 12);
        let template = smooth_pattern(50, 50, 2.5);

        let matcher = TemplateMatcher::default();
        let range = ScaleRange::new(0.4, 0.5).unwrap();
        let m = matcher
            .scale_and_match(&capture, &template, Some(0.8), Some(range))
            .unwrap();

        assert_eq!((m.width, m.height), (20, 20));
        assert!(m.x.abs_diff(10) <= 1 && m.y.abs_diff(12) <= 1);
    }

    #[test]
    fn test_large_capture_still_locates_template() {
        let mut capture = noise_image(420, 260, 81);
        let template = smooth_pattern(60, 44, 1.5);
        paste(&mut capture, &template, 301, 150);
        assert!(pyramid_levels(capture.dimensions(), template.dimensions()) > 0);

        let m = TemplateMatcher::default()
            .scale_and_match(&capture, &template, Some(0.9), None)
            .unwrap();
        assert_eq!(m.top_left(), (301, 150));
        assert_eq!((m.width, m.height), (60, 44));
    }

    #[test]
    fn test_resize_template_rounds_dimensions() {
        let template = noise_image(15, 7, 61);
        let scaled = resize_template(&template, 0.5).unwrap();
        assert_eq!(scaled.dimensions(), (8, 4));
        assert!(resize_template(&template, 0.01).is_none());
    }
}
