//! Palette extraction from the reserved reference row.
//!
//! Row 0 of the input sheet encodes one 3-color triplet per layer. The row is
//! split into one contiguous equal-width segment per layer; each segment's
//! distinct colors, in the order they are first seen scanning left to right,
//! become that layer's `{light, mid, dark}` triplet. The green marker color
//! is padding between and after triplets and is never part of a palette.

use image::{Rgb, RgbaImage};
use thiserror::Error;

use crate::color::{self, Shade, TRANSPARENT_MARKER};

/// Error type for palette extraction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// A reference-row segment did not hold exactly 3 distinct colors.
    #[error("reference row segment {segment} holds {found} distinct colors, expected 3")]
    SegmentColorCount { segment: usize, found: usize },
    /// The image width cannot be split into equal per-layer segments.
    #[error("image width {width} cannot be split into {layers} equal reference segments")]
    UnevenSegments { width: u32, layers: usize },
    /// No layers were requested.
    #[error("at least one layer is required for palette extraction")]
    NoLayers,
}

/// The 3-color palette of one sprite layer, ordered lightest to darkest by
/// encounter order in the reference row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteLayer {
    /// Layer index, matching reference-row segment order.
    pub index: usize,
    pub light: Rgb<u8>,
    pub mid: Rgb<u8>,
    pub dark: Rgb<u8>,
}

impl PaletteLayer {
    /// The triplet in slot order.
    pub fn colors(&self) -> [Rgb<u8>; 3] {
        [self.light, self.mid, self.dark]
    }

    /// Exact-match classification of a source color into a shade slot.
    pub fn shade_of(&self, color: Rgb<u8>) -> Option<Shade> {
        let colors = self.colors();
        Shade::ALL.into_iter().find(|s| colors[*s as usize] == color)
    }

    /// Nearest-distance classification. Ties resolve to the lighter slot.
    pub fn nearest_shade(&self, color: Rgb<u8>) -> Shade {
        let colors = self.colors();
        let mut best = Shade::Light;
        let mut best_dist = color::distance_sq(color, colors[0]);
        for shade in [Shade::Mid, Shade::Dark] {
            let dist = color::distance_sq(color, colors[shade as usize]);
            if dist < best_dist {
                best = shade;
                best_dist = dist;
            }
        }
        best
    }
}

/// Extract one [`PaletteLayer`] per layer from the sheet's reference row.
///
/// The row is partitioned into `layers` contiguous equal-width segments,
/// index 0 leftmost. Marker-green padding pixels are skipped; every other
/// distinct color is collected in first-seen order. A segment with fewer or
/// more than 3 distinct colors fails with
/// [`PaletteError::SegmentColorCount`] naming the segment.
pub fn extract_palettes(sheet: &RgbaImage, layers: usize) -> Result<Vec<PaletteLayer>, PaletteError> {
    if layers == 0 {
        return Err(PaletteError::NoLayers);
    }
    let width = sheet.width();
    if width as usize % layers != 0 {
        return Err(PaletteError::UnevenSegments { width, layers });
    }
    let segment_width = width / layers as u32;

    let mut palettes = Vec::with_capacity(layers);
    for segment in 0..layers {
        let start = segment as u32 * segment_width;
        let mut seen: Vec<Rgb<u8>> = Vec::new();
        for x in start..start + segment_width {
            let rgb = color::rgb_of(*sheet.get_pixel(x, 0));
            if rgb == TRANSPARENT_MARKER {
                continue;
            }
            if !seen.contains(&rgb) {
                seen.push(rgb);
            }
        }
        if seen.len() != 3 {
            return Err(PaletteError::SegmentColorCount { segment, found: seen.len() });
        }
        palettes.push(PaletteLayer {
            index: segment,
            light: seen[0],
            mid: seen[1],
            dark: seen[2],
        });
    }
    Ok(palettes)
}
