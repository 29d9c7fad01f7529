//! Frame assembly - groups tiles into ordered animation frames.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How tiles are drawn from the tile set when building frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameLayout {
    /// Frame k takes the consecutive run `[k*tpf, (k+1)*tpf)`.
    #[default]
    Sequential,
    /// Tiles are dealt round-robin: frame k takes tiles `k, k+F, k+2F, ...`
    /// where F is the frame count. Supports sheets where consecutive columns
    /// belong to different frames.
    Interleaved,
}

impl fmt::Display for FrameLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameLayout::Sequential => write!(f, "sequential"),
            FrameLayout::Interleaved => write!(f, "interleaved"),
        }
    }
}

impl FromStr for FrameLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(FrameLayout::Sequential),
            "interleaved" => Ok(FrameLayout::Interleaved),
            other => Err(format!(
                "unknown frame layout '{other}', expected 'sequential' or 'interleaved'"
            )),
        }
    }
}

/// Error type for frame assembly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The tile count does not split evenly into frames.
    #[error("{tile_count} tiles cannot be split into frames of {tiles_per_frame}")]
    Misaligned { tile_count: usize, tiles_per_frame: usize },
    /// Zero tiles per frame was requested.
    #[error("tiles per frame must be positive")]
    ZeroTilesPerFrame,
}

/// One animation frame: an ordered group of tile indices.
///
/// Frames are always unmirrored; mirrored variants are derived later by the
/// state builder replaying the same indices with a flip flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub index: usize,
    pub tiles: Vec<usize>,
}

/// Group `tile_count` tiles into frames of `tiles_per_frame` each.
///
/// Every tile is consumed exactly once; a remainder fails with
/// [`FrameError::Misaligned`].
pub fn assemble(
    tile_count: usize,
    tiles_per_frame: usize,
    layout: FrameLayout,
) -> Result<Vec<Frame>, FrameError> {
    if tiles_per_frame == 0 {
        return Err(FrameError::ZeroTilesPerFrame);
    }
    if tile_count % tiles_per_frame != 0 {
        return Err(FrameError::Misaligned { tile_count, tiles_per_frame });
    }

    let frame_count = tile_count / tiles_per_frame;
    let frames = (0..frame_count)
        .map(|index| {
            let tiles = match layout {
                FrameLayout::Sequential => {
                    (index * tiles_per_frame..(index + 1) * tiles_per_frame).collect()
                }
                FrameLayout::Interleaved => {
                    (0..tiles_per_frame).map(|t| index + t * frame_count).collect()
                }
            };
            Frame { index, tiles }
        })
        .collect();
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_runs() {
        let frames = assemble(8, 2, FrameLayout::Sequential).unwrap();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].tiles, vec![0, 1]);
        assert_eq!(frames[3].tiles, vec![6, 7]);
    }

    #[test]
    fn test_interleaved_round_robin() {
        // 8 tiles, 2 per frame, 4 frames: frame k gets k and k+4
        let frames = assemble(8, 2, FrameLayout::Interleaved).unwrap();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].tiles, vec![0, 4]);
        assert_eq!(frames[1].tiles, vec![1, 5]);
        assert_eq!(frames[3].tiles, vec![3, 7]);
    }

    #[test]
    fn test_no_tiles_dropped_or_duplicated() {
        for layout in [FrameLayout::Sequential, FrameLayout::Interleaved] {
            let frames = assemble(12, 3, layout).unwrap();
            let mut all: Vec<usize> = frames.iter().flat_map(|f| f.tiles.clone()).collect();
            all.sort_unstable();
            assert_eq!(all, (0..12).collect::<Vec<_>>(), "layout {layout}");
        }
    }

    #[test]
    fn test_frames_times_tpf_equals_tile_count() {
        let frames = assemble(24, 4, FrameLayout::Sequential).unwrap();
        assert_eq!(frames.len() * 4, 24);
        assert!(frames.iter().all(|f| f.tiles.len() == 4));
    }

    #[test]
    fn test_misaligned_tile_count() {
        let err = assemble(7, 2, FrameLayout::Sequential).unwrap_err();
        assert_eq!(err, FrameError::Misaligned { tile_count: 7, tiles_per_frame: 2 });
    }

    #[test]
    fn test_zero_tiles_per_frame() {
        assert_eq!(
            assemble(8, 0, FrameLayout::Sequential).unwrap_err(),
            FrameError::ZeroTilesPerFrame
        );
    }

    #[test]
    fn test_empty_tile_set() {
        let frames = assemble(0, 2, FrameLayout::Sequential).unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn test_single_tile_frames() {
        let frames = assemble(3, 1, FrameLayout::Interleaved).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].tiles, vec![2]);
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!("sequential".parse::<FrameLayout>().unwrap(), FrameLayout::Sequential);
        assert_eq!("interleaved".parse::<FrameLayout>().unwrap(), FrameLayout::Interleaved);
        assert!("diagonal".parse::<FrameLayout>().is_err());
    }
}
