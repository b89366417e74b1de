//! Synthetic images shared by the unit tests

use image::{GrayImage, Luma, Rgb, RgbImage};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// Deterministic pseudo-random noise, different for every seed
pub fn noise_image(width: u32, height: u32, seed: u32) -> GrayImage {
    let mut state = seed.wrapping_mul(2_654_435_761) | 1;
    GrayImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        Luma([(state >> 24) as u8])
    })
}

/// Low-frequency pattern sampled at `1 / density` pixel spacing.
///
/// Rendering it with `density = 2.0` produces a copy twice as large as
/// `density = 1.0`, which is what the multi-scale tests rely on.
pub fn smooth_pattern(width: u32, height: u32, density: f64) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let fx = x as f64 / density;
        let fy = y as f64 / density;
        let v = 128.0
            + 60.0 * (fx / 3.0).sin()
            + 50.0 * (fy / 4.0).cos()
            + 10.0 * ((fx + fy) / 5.0).sin();
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

pub fn paste(target: &mut GrayImage, patch: &GrayImage, x: u32, y: u32) {
    image::imageops::replace(target, patch, x as i64, y as i64);
}

pub fn to_rgb(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y)[0];
        Rgb([v, v, v])
    })
}

/// Write an image to a unique file under the system temp directory
pub fn write_temp_png(label: &str, image: &GrayImage) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "screen-locator-{}-{}-{}.png",
        std::process::id(),
        n,
        label
    ));
    image.save(&path).expect("write temp template");
    path
}
