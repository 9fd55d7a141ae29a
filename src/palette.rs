//! Palettes ordered by poppiness, and their extraction from decoded images.

use ::palette::{IntoColor, Lab, Srgb};
use image::imageops::FilterType;
use image::DynamicImage;
use kmeans_colors::get_kmeans_hamerly;
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Palette size stored for every ingested image.
pub const DEFAULT_PALETTE_SIZE: usize = 8;
/// Palette size used for the reference preview listing.
pub const PREVIEW_PALETTE_SIZE: usize = 6;

/// Lightness below/above which a color is considered visually flat.
const DARK_CUTOFF: f64 = 15.0;
const LIGHT_CUTOFF: f64 = 85.0;
const FLAT_PENALTY: f64 = 0.3;

/// Visual vividness of a color: saturation, damped for near-black and near-white.
pub fn poppiness(color: &Color) -> f64 {
    let mut score = color.saturation();
    let l = color.lightness();
    if !(DARK_CUTOFF..=LIGHT_CUTOFF).contains(&l) {
        score *= FLAT_PENALTY;
    }
    score
}

/// Ordered colors of an image, most poppy first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Sort candidates by poppiness (descending, stable) and keep the first `size`.
    pub fn from_colors(mut colors: Vec<Color>, size: usize) -> Self {
        colors.sort_by(|a, b| {
            poppiness(b)
                .partial_cmp(&poppiness(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        colors.truncate(size);
        Self { colors }
    }

    /// Build from hex strings. Order is taken as given.
    #[cfg(test)]
    pub fn from_hex<S: AsRef<str>>(
        hexes: &[S],
    ) -> Result<Self, crate::error::ColorError> {
        let colors = hexes
            .iter()
            .map(|h| Color::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// The leading `n` colors used for matching.
    pub fn dominant(&self, n: usize) -> &[Color] {
        &self.colors[..n.min(self.colors.len())]
    }

    pub fn primary(&self) -> Option<&Color> {
        self.colors.first()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Extract `size` representative colors with k-means in Lab space.
pub fn extract_palette(img: &DynamicImage, size: usize) -> Palette {
    const CONVERGENCE_THRESHOLD: f32 = 5.0;
    const MAX_ITERATIONS: usize = 30;
    const THUMBNAIL_SIZE: u32 = 128;
    const SEED: u64 = 0;

    if size == 0 {
        return Palette::default();
    }

    let thumb = img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Triangle).to_rgb8();

    // Flat images have fewer distinct colors than clusters; take them as-is.
    let mut distinct: Vec<(u8, u8, u8)> = Vec::with_capacity(size + 1);
    for p in thumb.pixels() {
        let rgb = (p.0[0], p.0[1], p.0[2]);
        if !distinct.contains(&rgb) {
            distinct.push(rgb);
            if distinct.len() > size {
                break;
            }
        }
    }
    if distinct.is_empty() {
        return Palette::default();
    }
    if distinct.len() <= size {
        let colors: Vec<Color> = distinct
            .iter()
            .cycle()
            .take(size)
            .map(|&(r, g, b)| Color::from_rgb(r, g, b))
            .collect();
        return Palette::from_colors(colors, size);
    }

    let lab: Vec<Lab> = thumb
        .pixels()
        .map(|p| {
            let rgb = Srgb::new(
                p.0[0] as f32 / 255.0,
                p.0[1] as f32 / 255.0,
                p.0[2] as f32 / 255.0,
            );
            rgb.into_color()
        })
        .collect();

    let result = get_kmeans_hamerly(
        size,
        MAX_ITERATIONS,
        CONVERGENCE_THRESHOLD,
        false,
        &lab,
        SEED,
    );

    let colors: Vec<Color> = result
        .centroids
        .iter()
        .map(|c| {
            let rgb: Srgb = (*c).into_color();
            Color::from_rgb(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
        })
        .collect();

    tracing::debug!(size, extracted = colors.len(), "extracted palette");
    Palette::from_colors(colors, size)
}

/// Lab centroids can land outside the sRGB gamut.
fn channel(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
