//! Palette extraction.
//!
//! Every strategy starts from the same preprocessing: the bitmap is resized to
//! a fixed size (aspect ratio is not kept), converted to RGB and flattened into
//! a sample set. Clustering and quantile then optionally drop near-black,
//! near-white and near-gray pixels; the histogram always sees every pixel.

use std::collections::HashSet;

use image::DynamicImage;
use kmeans_colors::{Kmeans, get_kmeans};
use palette::Srgb;

use crate::color::Color;
use crate::config::{Algorithm, AnalyzerConfig, ResizeFilter};

/// Filtering may keep as little as this share of the samples before the
/// unfiltered set is used instead.
pub const MIN_RETAINED_FRACTION: f64 = 0.1;

/// Bins per channel of the RGB histogram.
pub const HISTOGRAM_BINS: usize = 25;

const KMEANS_RUNS: u64 = 10;
const KMEANS_MAX_ITER: usize = 50;
const KMEANS_CONVERGE: f32 = 0.0025;

/// Parameters of a single extraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtractOptions {
    /// Maximum palette size `k`.
    pub num_colors: usize,
    pub width: u32,
    pub height: u32,
    pub filter: ResizeFilter,
    pub algorithm: Algorithm,
    pub filter_pixels: bool,
    pub brightness_threshold: f64,
    pub saturation_threshold: f64,
    /// Base seed for the k-means runs.
    pub seed: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        AnalyzerConfig::default().extract_options()
    }
}

/// Extract up to `num_colors` representative colors from `image`.
///
/// Returns fewer colors when the sample set is too small to fill the palette.
pub fn extract(image: &DynamicImage, opts: &ExtractOptions) -> Vec<Color> {
    let pixels = flatten(image, opts.width, opts.height, opts.filter);
    let k = opts.num_colors;

    let palette = match opts.algorithm {
        Algorithm::Clustering => kmeans_palette(&sample_set(pixels, opts), k, opts.seed),
        Algorithm::Quantile => quantile_palette(&sample_set(pixels, opts), k),
        Algorithm::Histogram => histogram_palette(&pixels, k),
    };

    log::debug!(
        "{} produced {} of {} colors",
        opts.algorithm,
        palette.len(),
        k
    );
    palette
}

/// Resize to exactly `width × height` and collect the RGB pixels in row order.
pub fn flatten(image: &DynamicImage, width: u32, height: u32, filter: ResizeFilter) -> Vec<Color> {
    image
        .resize_exact(width, height, filter.into())
        .to_rgb8()
        .pixels()
        .map(|&px| Color::from(px))
        .collect()
}

/// Keep pixels that are neither too dark, too light nor too gray.
pub fn filter_pixels(
    pixels: &[Color],
    brightness_threshold: f64,
    saturation_threshold: f64,
) -> Vec<Color> {
    pixels
        .iter()
        .copied()
        .filter(|c| {
            let hsv = c.to_hsv();
            hsv.v > brightness_threshold
                && hsv.v < 1.0 - brightness_threshold
                && hsv.s > saturation_threshold
        })
        .collect()
}

fn sample_set(pixels: Vec<Color>, opts: &ExtractOptions) -> Vec<Color> {
    if !opts.filter_pixels {
        return pixels;
    }

    let filtered = filter_pixels(
        &pixels,
        opts.brightness_threshold,
        opts.saturation_threshold,
    );
    if (filtered.len() as f64) < pixels.len() as f64 * MIN_RETAINED_FRACTION {
        log::warn!(
            "Too many pixels filtered out ({} of {} kept), using original pixels",
            filtered.len(),
            pixels.len()
        );
        pixels
    } else {
        filtered
    }
}

/// K-means in RGB space, centroids ordered by descending cluster population.
///
/// `k` is reduced to the number of distinct samples, so an empty sample set
/// yields an empty palette.
pub fn kmeans_palette(samples: &[Color], k: usize, seed: u64) -> Vec<Color> {
    let distinct = samples.iter().copied().collect::<HashSet<_>>().len();
    let k = k.min(distinct);
    if k == 0 {
        return Vec::new();
    }

    let buf: Vec<Srgb> = samples
        .iter()
        .map(|&c| Srgb::<u8>::from(c).into_format())
        .collect();

    let mut best: Kmeans<Srgb> = Kmeans::new();
    for run in 0..KMEANS_RUNS {
        let result = get_kmeans(
            k,
            KMEANS_MAX_ITER,
            KMEANS_CONVERGE,
            false,
            &buf,
            seed.wrapping_add(run),
        );
        if result.score < best.score {
            best = result;
        }
    }

    let mut counts = vec![0usize; best.centroids.len()];
    for &idx in &best.indices {
        counts[idx as usize] += 1;
    }

    // Stable: equal populations keep centroid order.
    let mut order: Vec<usize> = (0..best.centroids.len()).collect();
    order.sort_by(|&a, &b| counts[b].cmp(&counts[a]));

    order
        .into_iter()
        .map(|i| Color::from(best.centroids[i].into_format::<u8>()))
        .collect()
}

/// The `i / (k + 1)` quantile of each channel, for `i` in `1..=k`.
///
/// Channels are independent, so every channel is non-decreasing along the
/// palette.
pub fn quantile_palette(samples: &[Color], k: usize) -> Vec<Color> {
    if samples.is_empty() {
        return Vec::new();
    }

    let sorted_channel = |get: fn(&Color) -> u8| {
        let mut channel: Vec<u8> = samples.iter().map(get).collect();
        channel.sort_unstable();
        channel
    };
    let reds = sorted_channel(|c| c.r);
    let greens = sorted_channel(|c| c.g);
    let blues = sorted_channel(|c| c.b);

    (1..=k)
        .map(|i| {
            let q = i as f64 / (k + 1) as f64;
            Color::new(quantile(&reds, q), quantile(&greens, q), quantile(&blues, q))
        })
        .collect()
}

/// Linear interpolation between the closest order statistics, truncated.
fn quantile(sorted: &[u8], q: f64) -> u8 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let lo_value = sorted[lo] as f64;
    let value = lo_value + (sorted[hi] as f64 - lo_value) * (pos - lo as f64);
    value as u8
}

/// Centers of the `k` most populated non-empty histogram bins, emitted in
/// ascending count order so the most populated bin comes last.
///
/// Equal counts prefer the lowest bin index (`r * 625 + g * 25 + b`), both
/// when selecting and when ordering.
pub fn histogram_palette(pixels: &[Color], k: usize) -> Vec<Color> {
    let mut counts = vec![0u32; HISTOGRAM_BINS.pow(3)];
    for c in pixels {
        counts[bin_index(c)] += 1;
    }

    let mut populated: Vec<(usize, u32)> = counts
        .into_iter()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .collect();
    populated.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    populated.truncate(k);
    populated.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

    populated
        .into_iter()
        .map(|(idx, _)| {
            let r = idx / (HISTOGRAM_BINS * HISTOGRAM_BINS);
            let g = (idx / HISTOGRAM_BINS) % HISTOGRAM_BINS;
            let b = idx % HISTOGRAM_BINS;
            Color::new(bin_center(r), bin_center(g), bin_center(b))
        })
        .collect()
}

fn bin_index(c: &Color) -> usize {
    let bin = |v: u8| (v as usize * HISTOGRAM_BINS / 255).min(HISTOGRAM_BINS - 1);
    bin(c.r) * HISTOGRAM_BINS * HISTOGRAM_BINS + bin(c.g) * HISTOGRAM_BINS + bin(c.b)
}

/// Midpoint of bin `i` over `[0, 255]`, truncated.
fn bin_center(i: usize) -> u8 {
    ((2 * i + 1) * 255 / (2 * HISTOGRAM_BINS)) as u8
}
