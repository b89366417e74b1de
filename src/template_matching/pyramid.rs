//! Coarse-to-fine search for large captures
//!
//! When a full correlation scan would cost more than [`FULL_SCAN_WORK`]
//! multiply-adds, capture and template are halved (2x2 box filter) until the
//! scan fits the budget. The strongest coarse peaks are then rescored at full
//! resolution in a small window around their upsampled positions.

use super::correlation::{CorrelationMap, correlation_map, score_at};
use super::types::MatchMethod;
use image::{GrayImage, Luma};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Multiply-adds a single full-resolution scan may spend
pub const FULL_SCAN_WORK: u64 = 50_000_000;

// Templates are not shrunk below this many pixels per side
const MIN_COARSE_SIDE: u32 = 8;

// Coarse peaks carried to full resolution
const COARSE_PEAKS: usize = 8;

/// Multiply-adds of a full correlation scan, 0 when the template does not fit
pub fn scan_work(image: (u32, u32), template: (u32, u32)) -> u64 {
    if template.0 == 0 || template.1 == 0 || template.0 > image.0 || template.1 > image.1 {
        return 0;
    }
    let positions = (image.0 - template.0 + 1) as u64 * (image.1 - template.1 + 1) as u64;
    positions * template.0 as u64 * template.1 as u64
}

/// Number of halvings before the coarse scan; 0 means a direct full scan
pub fn pyramid_levels(image: (u32, u32), template: (u32, u32)) -> u32 {
    let (mut image, mut template) = (image, template);
    let mut levels = 0;
    while scan_work(image, template) > FULL_SCAN_WORK
        && template.0 / 2 >= MIN_COARSE_SIDE
        && template.1 / 2 >= MIN_COARSE_SIDE
    {
        image = (image.0 / 2, image.1 / 2);
        template = (template.0 / 2, template.1 / 2);
        levels += 1;
    }
    levels
}

/// Upper bound on the multiply-adds a search of this size performs
pub fn planned_work(image: (u32, u32), template: (u32, u32)) -> u64 {
    let levels = pyramid_levels(image, template);
    if levels == 0 {
        return scan_work(image, template);
    }

    let coarse = scan_work(
        (image.0 >> levels, image.1 >> levels),
        (template.0 >> levels, template.1 >> levels),
    );
    let side = 2 * refine_radius(levels) as u64 + 1;
    let refine = COARSE_PEAKS as u64 * side * side * template.0 as u64 * template.1 as u64;
    coarse + refine
}

fn refine_radius(levels: u32) -> u32 {
    (1 << levels) + 1
}

/// Halve both dimensions, averaging each 2x2 block with rounding
pub fn half_size(image: &GrayImage) -> GrayImage {
    GrayImage::from_fn(image.width() / 2, image.height() / 2, |x, y| {
        let sum = image.get_pixel(2 * x, 2 * y)[0] as u32
            + image.get_pixel(2 * x + 1, 2 * y)[0] as u32
            + image.get_pixel(2 * x, 2 * y + 1)[0] as u32
            + image.get_pixel(2 * x + 1, 2 * y + 1)[0] as u32;
        Luma([((sum + 2) / 4) as u8])
    })
}

/// Best `(score, x, y)` found by scanning `levels` halvings down and refining
/// the strongest coarse peaks at full resolution.
///
/// Returns `None` when the template does not fit the image. At least one
/// halving is always applied.
pub fn coarse_to_fine(
    image: &GrayImage,
    template: &GrayImage,
    method: MatchMethod,
    levels: u32,
) -> Option<(f32, u32, u32)> {
    let levels = levels.max(1);
    let max_x = image.width().checked_sub(template.width())?;
    let max_y = image.height().checked_sub(template.height())?;

    let mut small_image = half_size(image);
    let mut small_template = half_size(template);
    for _ in 1..levels {
        small_image = half_size(&small_image);
        small_template = half_size(&small_template);
    }

    let map = correlation_map(&small_image, &small_template, method)?;
    let suppression = (small_template.width().min(small_template.height()) / 2).max(1);
    let peaks = strongest_peaks(&map, COARSE_PEAKS, suppression);

    let radius = refine_radius(levels);
    let mut positions = BTreeSet::new();
    for (cx, cy) in peaks {
        let (fx, fy) = (cx << levels, cy << levels);
        for y in fy.saturating_sub(radius)..=(fy + radius).min(max_y) {
            for x in fx.saturating_sub(radius)..=(fx + radius).min(max_x) {
                positions.insert((y, x));
            }
        }
    }

    let positions: Vec<(u32, u32)> = positions.into_iter().collect();
    let scores: Vec<f32> = positions
        .par_iter()
        .map(|&(y, x)| score_at(image, template, x, y, method))
        .collect();

    let mut best: Option<(f32, u32, u32)> = None;
    for (&(y, x), &score) in positions.iter().zip(&scores) {
        if best.is_none_or(|(b, _, _)| score > b) {
            best = Some((score, x, y));
        }
    }
    best
}

/// Up to `count` highest map entries, no two within `radius` of each other
fn strongest_peaks(
    map: &CorrelationMap,
    count: usize,
    radius: u32,
) -> Vec<(u32, u32)> {
    let mut ranked: Vec<(f32, u32, u32)> = map
        .enumerate_pixels()
        .map(|(x, y, p)| (p[0], x, y))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut peaks: Vec<(u32, u32)> = Vec::with_capacity(count);
    for (_, x, y) in ranked {
        if peaks.len() == count {
            break;
        }
        let clear = peaks
            .iter()
            .all(|&(px, py)| px.abs_diff(x) > radius || py.abs_diff(y) > radius);
        if clear {
            peaks.push((x, y));
        }
    }
    peaks
}
