//! Correlation maps for template matching
//!
//! Each map has one entry per valid top-left position of the template inside
//! the image, so its size is `(W - w + 1) x (H - h + 1)`.

use super::types::MatchMethod;
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::template_matching::{MatchTemplateMethod, match_template};
use rayon::prelude::*;

pub type CorrelationMap = ImageBuffer<Luma<f32>, Vec<f32>>;

// Below this the window (or template) is treated as flat and scores 0
const MIN_VARIANCE: f64 = 1e-6;

/// Compute the correlation map of `template` over `image`.
///
/// Returns `None` when the template is empty or does not fit inside the
/// image, i.e. when there is no valid position at all.
pub fn correlation_map(
    image: &GrayImage,
    template: &GrayImage,
    method: MatchMethod,
) -> Option<CorrelationMap> {
    if template.width() == 0
        || template.height() == 0
        || template.width() > image.width()
        || template.height() > image.height()
    {
        return None;
    }

    let map = match method {
        MatchMethod::CoefficientNormalized => coefficient_normalized(image, template),
        MatchMethod::CrossCorrelationNormalized => {
            match_template(image, template, MatchTemplateMethod::CrossCorrelationNormalized)
        }
    };
    Some(map)
}

/// Summed-area tables of pixel values and squared pixel values
struct SummedArea {
    stride: usize,
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl SummedArea {
    fn new(image: &GrayImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let stride = width + 1;
        let mut sum = vec![0.0; stride * (height + 1)];
        let mut sum_sq = vec![0.0; stride * (height + 1)];

        for y in 0..height {
            let mut row_sum = 0.0;
            let mut row_sum_sq = 0.0;
            for x in 0..width {
                let v = image.get_pixel(x as u32, y as u32)[0] as f64;
                row_sum += v;
                row_sum_sq += v * v;
                let idx = (y + 1) * stride + (x + 1);
                sum[idx] = sum[idx - stride] + row_sum;
                sum_sq[idx] = sum_sq[idx - stride] + row_sum_sq;
            }
        }

        Self {
            stride,
            sum,
            sum_sq,
        }
    }

    /// (sum, sum of squares) over the `w x h` window at `(x, y)`
    fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (f64, f64) {
        let a = y * self.stride + x;
        let b = y * self.stride + x + w;
        let c = (y + h) * self.stride + x;
        let d = (y + h) * self.stride + x + w;
        (
            self.sum[d] - self.sum[b] - self.sum[c] + self.sum[a],
            self.sum_sq[d] - self.sum_sq[b] - self.sum_sq[c] + self.sum_sq[a],
        )
    }
}

/// Zero-mean normalized cross-correlation:
///
/// `R(x, y) = sum(T'(u, v) * I'(x + u, y + v)) / sqrt(sum(T'^2) * sum(I'^2))`
///
/// where `T'` and `I'` are the template and the image window with their
/// means removed. Flat windows or flat templates score 0.
fn coefficient_normalized(image: &GrayImage, template: &GrayImage) -> CorrelationMap {
    let (tw, th) = (template.width() as usize, template.height() as usize);
    let iw = image.width() as usize;
    let n = (tw * th) as f64;

    let t_mean = template.pixels().map(|p| p[0] as f64).sum::<f64>() / n;
    let t_prime: Vec<f64> = template.pixels().map(|p| p[0] as f64 - t_mean).collect();
    let var_t: f64 = t_prime.iter().map(|v| v * v).sum();

    let out_w = image.width() - template.width() + 1;
    let out_h = image.height() - template.height() + 1;
    let mut out = CorrelationMap::new(out_w, out_h);

    if var_t <= MIN_VARIANCE {
        return out;
    }

    let sat = SummedArea::new(image);
    let raw = image.as_raw();
    let scores: &mut [f32] = &mut out;

    scores
        .par_chunks_mut(out_w as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, score) in row.iter_mut().enumerate() {
                let (sum_i, sum_i2) = sat.window(x, y, tw, th);
                let var_i = sum_i2 - sum_i * sum_i / n;
                if var_i <= MIN_VARIANCE {
                    continue;
                }

                // Sum(T' * I) equals Sum(T' * I') because T' has zero mean
                let mut dot = 0.0;
                for ty in 0..th {
                    let start = (y + ty) * iw + x;
                    let img_row = &raw[start..start + tw];
                    let tpl_row = &t_prime[ty * tw..(ty + 1) * tw];
                    for (t, &v) in tpl_row.iter().zip(img_row) {
                        dot += t * v as f64;
                    }
                }

                *score = (dot / (var_t * var_i).sqrt()) as f32;
            }
        });

    out
}

/// Score of a single template position, for searches that only visit a few.
///
/// Agrees with the corresponding entry of [`correlation_map`]. The caller
/// guarantees the template fits at `(x, y)`.
pub fn score_at(
    image: &GrayImage,
    template: &GrayImage,
    x: u32,
    y: u32,
    method: MatchMethod,
) -> f32 {
    let (mut sum_t, mut sum_t2) = (0.0f64, 0.0f64);
    let (mut sum_i, mut sum_i2, mut sum_ti) = (0.0f64, 0.0f64, 0.0f64);

    for (tx, ty, t) in template.enumerate_pixels() {
        let t = t[0] as f64;
        let v = image.get_pixel(x + tx, y + ty)[0] as f64;
        sum_t += t;
        sum_t2 += t * t;
        sum_i += v;
        sum_i2 += v * v;
        sum_ti += t * v;
    }

    match method {
        MatchMethod::CoefficientNormalized => {
            let n = (template.width() * template.height()) as f64;
            let var_t = sum_t2 - sum_t * sum_t / n;
            let var_i = sum_i2 - sum_i * sum_i / n;
            if var_t <= MIN_VARIANCE || var_i <= MIN_VARIANCE {
                return 0.0;
            }
            ((sum_ti - sum_t * sum_i / n) / (var_t * var_i).sqrt()) as f32
        }
        MatchMethod::CrossCorrelationNormalized => {
            let norm = (sum_t2 * sum_i2).sqrt();
            if norm <= 0.0 {
                return 0.0;
            }
            (sum_ti / norm) as f32
        }
    }
}
