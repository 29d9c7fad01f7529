//! Tile grid partitioning.
//!
//! Splits a sheet into fixed-size tiles enumerated row-major. Divisibility
//! violations are configuration errors that name the offending axis.

use image::RgbaImage;
use std::fmt;
use thiserror::Error;

/// Image axis, used to name which dimension violated a precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Width => write!(f, "width"),
            Axis::Height => write!(f, "height"),
        }
    }
}

/// Error type for tile grid construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    /// An image dimension is not an exact multiple of the tile dimension.
    #[error("image {axis} of {image_px}px is not divisible by tile {axis} of {tile_px}px")]
    NotDivisible { axis: Axis, image_px: u32, tile_px: u32 },
    /// A tile dimension of zero was requested.
    #[error("tile {axis} must be positive")]
    ZeroTileDimension { axis: Axis },
}

/// One fixed-size pixel block with its grid position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub row: u32,
    pub col: u32,
    pub pixels: RgbaImage,
}

/// A regular partition of a sheet into tiles, row-major and zero-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    tile_width: u32,
    tile_height: u32,
    cols: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Partition `sheet` into `(height/tile_height) × (width/tile_width)`
    /// tiles, left-to-right then top-to-bottom.
    pub fn split(sheet: &RgbaImage, tile_width: u32, tile_height: u32) -> Result<Self, TileError> {
        if tile_width == 0 {
            return Err(TileError::ZeroTileDimension { axis: Axis::Width });
        }
        if tile_height == 0 {
            return Err(TileError::ZeroTileDimension { axis: Axis::Height });
        }
        let (width, height) = sheet.dimensions();
        if width % tile_width != 0 {
            return Err(TileError::NotDivisible {
                axis: Axis::Width,
                image_px: width,
                tile_px: tile_width,
            });
        }
        if height % tile_height != 0 {
            return Err(TileError::NotDivisible {
                axis: Axis::Height,
                image_px: height,
                tile_px: tile_height,
            });
        }

        let cols = width / tile_width;
        let rows = height / tile_height;
        let mut tiles = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let pixels = image::imageops::crop_imm(
                    sheet,
                    col * tile_width,
                    row * tile_height,
                    tile_width,
                    tile_height,
                )
                .to_image();
                tiles.push(Tile { row, col, pixels });
            }
        }

        Ok(Self { tile_width, tile_height, cols, rows, tiles })
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of tiles in the grid.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Grid position `(row, col)` of a tile index.
    pub fn position(&self, index: usize) -> (u32, u32) {
        let index = index as u32;
        (index / self.cols, index % self.cols)
    }

    /// Pixel origin `(x, y)` of a tile index in the source sheet.
    pub fn slice_origin(&self, index: usize) -> (u32, u32) {
        let (row, col) = self.position(index);
        (col * self.tile_width, row * self.tile_height)
    }

    /// Rebuild the source sheet from the tiles.
    pub fn reassemble(&self) -> RgbaImage {
        let mut sheet = RgbaImage::new(self.cols * self.tile_width, self.rows * self.tile_height);
        for tile in &self.tiles {
            let ox = tile.col * self.tile_width;
            let oy = tile.row * self.tile_height;
            for y in 0..self.tile_height {
                for x in 0..self.tile_width {
                    sheet.put_pixel(ox + x, oy + y, *tile.pixels.get_pixel(x, y));
                }
            }
        }
        sheet
    }
}
