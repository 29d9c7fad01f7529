//! Per-layer 3-tone quantization.
//!
//! For each layer the sheet's pixels are classified against that layer's
//! triplet and rewritten to the fixed output tones, producing one "band" per
//! layer. Source art is expected to already be reduced to the triplet colors,
//! so exact lookup is the primary path; what happens to stray colors is an
//! explicit configuration choice ([`MatchMode`]).

use image::RgbaImage;
use rayon::prelude::*;
use thiserror::Error;

use crate::color::{self, Shade, TRANSPARENT_MARKER};
use crate::palette::PaletteLayer;

/// How pixels that match no palette color exactly are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Any color outside the lookup table is an error.
    Exact,
    /// Classify stray colors to the nearest triplet color by RGB distance.
    #[default]
    NearestFallback,
}

/// Quantization settings, one value per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizeOptions {
    pub mode: MatchMode,
    /// Pixels with alpha strictly below this become the transparent marker.
    pub alpha_threshold: u8,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self { mode: MatchMode::default(), alpha_threshold: 8 }
    }
}

/// Error type for quantization failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantizeError {
    /// In [`MatchMode::Exact`], a pixel color matched no palette slot.
    #[error("pixel ({x}, {y}) color {color:?} matches no color of layer {layer}")]
    UnmatchedColor { layer: usize, x: u32, y: u32, color: [u8; 3] },
}

/// Quantize one layer of the sheet into a 3-tone band.
///
/// Classification order per pixel:
/// 1. alpha below the threshold, or already the marker green → transparent
///    marker;
/// 2. exact match against the layer triplet or against the fixed output
///    tones → corresponding slot tone (the latter makes the operation
///    idempotent);
/// 3. otherwise, per [`MatchMode`]: nearest-distance slot, or an error.
pub fn quantize_layer(
    sheet: &RgbaImage,
    palette: &PaletteLayer,
    options: &QuantizeOptions,
) -> Result<RgbaImage, QuantizeError> {
    let mut band = RgbaImage::from_pixel(
        sheet.width(),
        sheet.height(),
        color::opaque(TRANSPARENT_MARKER),
    );

    for (x, y, pixel) in sheet.enumerate_pixels() {
        if pixel[3] < options.alpha_threshold {
            continue;
        }
        let rgb = color::rgb_of(*pixel);
        if rgb == TRANSPARENT_MARKER {
            continue;
        }

        let shade = match palette.shade_of(rgb).or_else(|| Shade::from_tone(rgb)) {
            Some(shade) => shade,
            None => match options.mode {
                MatchMode::NearestFallback => palette.nearest_shade(rgb),
                MatchMode::Exact => {
                    return Err(QuantizeError::UnmatchedColor {
                        layer: palette.index,
                        x,
                        y,
                        color: rgb.0,
                    })
                }
            },
        };
        band.put_pixel(x, y, color::opaque(shade.tone()));
    }

    Ok(band)
}

/// Quantize every layer of the sheet, one band per palette.
///
/// Layers are independent, so they run in parallel; results are collected
/// back into layer order.
pub fn quantize_layers(
    sheet: &RgbaImage,
    palettes: &[PaletteLayer],
    options: &QuantizeOptions,
) -> Result<Vec<RgbaImage>, QuantizeError> {
    palettes
        .par_iter()
        .map(|palette| quantize_layer(sheet, palette, options))
        .collect()
}

/// Stack per-layer bands vertically into one output sheet, band 0 on top.
pub fn stack_bands(bands: &[RgbaImage]) -> RgbaImage {
    if bands.is_empty() {
        return RgbaImage::from_pixel(1, 1, color::opaque(TRANSPARENT_MARKER));
    }
    let width = bands.iter().map(|b| b.width()).max().unwrap_or(1);
    let height: u32 = bands.iter().map(|b| b.height()).sum();
    let mut sheet = RgbaImage::from_pixel(width, height, color::opaque(TRANSPARENT_MARKER));

    let mut offset = 0;
    for band in bands {
        for y in 0..band.height() {
            for x in 0..band.width() {
                sheet.put_pixel(x, offset + y, *band.get_pixel(x, y));
            }
        }
        offset += band.height();
    }
    sheet
}
