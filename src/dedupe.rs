//! Tile deduplication.
//!
//! Sprite sheets repeat tiles constantly (symmetric bodies, idle frames).
//! Deduplication maps every tile index to the first tile with identical
//! pixel bytes, so the serializer can point duplicate slices at one source
//! rectangle and the engine uploads fewer unique tiles.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tiles::TileGrid;

/// Counts reported in the output document when deduplication is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupSummary {
    pub total_tiles: usize,
    pub unique_tiles: usize,
    pub duplicate_tiles: usize,
}

/// Result of scanning a tile grid for duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupReport {
    /// For each tile index, the index of its first identical occurrence
    /// (itself when unique).
    pub remap: Vec<usize>,
    pub summary: DedupSummary,
}

impl DedupReport {
    /// Canonical tile index for `index`.
    pub fn canonical(&self, index: usize) -> usize {
        self.remap.get(index).copied().unwrap_or(index)
    }
}

/// Scan the grid and map duplicate tiles to their first occurrence.
pub fn dedupe_tiles(grid: &TileGrid) -> DedupReport {
    let mut first_seen: HashMap<&[u8], usize> = HashMap::new();
    let mut remap = Vec::with_capacity(grid.len());
    let mut duplicate_tiles = 0;

    for (index, tile) in grid.tiles().iter().enumerate() {
        let key: &[u8] = tile.pixels.as_raw();
        match first_seen.get(key) {
            Some(&canonical) => {
                duplicate_tiles += 1;
                remap.push(canonical);
            }
            None => {
                first_seen.insert(key, index);
                remap.push(index);
            }
        }
    }

    let total_tiles = remap.len();
    DedupReport {
        remap,
        summary: DedupSummary {
            total_tiles,
            unique_tiles: total_tiles - duplicate_tiles,
            duplicate_tiles,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::opaque;
    use image::{Rgb, RgbaImage};

    /// 2x1-tile sheet of 2x2 tiles built from the given per-tile colors.
    fn sheet_of_tiles(colors: &[Rgb<u8>], cols: u32) -> TileGrid {
        let rows = colors.len() as u32 / cols;
        let mut sheet = RgbaImage::new(cols * 2, rows * 2);
        for (i, c) in colors.iter().enumerate() {
            let ox = (i as u32 % cols) * 2;
            let oy = (i as u32 / cols) * 2;
            for y in 0..2 {
                for x in 0..2 {
                    sheet.put_pixel(ox + x, oy + y, opaque(*c));
                }
            }
        }
        TileGrid::split(&sheet, 2, 2).unwrap()
    }

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    #[test]
    fn test_all_unique() {
        let grid = sheet_of_tiles(&[RED, BLUE], 2);
        let report = dedupe_tiles(&grid);
        assert_eq!(report.remap, vec![0, 1]);
        assert_eq!(report.summary.unique_tiles, 2);
        assert_eq!(report.summary.duplicate_tiles, 0);
    }

    #[test]
    fn test_duplicates_map_to_first_occurrence() {
        let grid = sheet_of_tiles(&[RED, BLUE, RED, RED], 2);
        let report = dedupe_tiles(&grid);
        assert_eq!(report.remap, vec![0, 1, 0, 0]);
        assert_eq!(report.summary.total_tiles, 4);
        assert_eq!(report.summary.unique_tiles, 2);
        assert_eq!(report.summary.duplicate_tiles, 2);
    }

    #[test]
    fn test_canonical_out_of_range_is_identity() {
        let grid = sheet_of_tiles(&[RED], 1);
        let report = dedupe_tiles(&grid);
        assert_eq!(report.canonical(0), 0);
        assert_eq!(report.canonical(99), 99);
    }

    #[test]
    fn test_summary_serializes_snake_case() {
        let grid = sheet_of_tiles(&[RED, RED], 2);
        let report = dedupe_tiles(&grid);
        let json = serde_json::to_string(&report.summary).unwrap();
        assert!(json.contains(r#""total_tiles":2"#));
        assert!(json.contains(r#""duplicate_tiles":1"#));
    }
}
