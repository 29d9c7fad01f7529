//! Aggregate error type for the conversion pipeline.

use thiserror::Error;

use crate::config::ConfigError;
use crate::frames::FrameError;
use crate::palette::PaletteError;
use crate::quantize::QuantizeError;
use crate::states::StateError;
use crate::tiles::TileError;

/// Any failure of one conversion invocation. All variants are deterministic
/// configuration or input mismatches; none are retried and no partial output
/// is produced.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input pixel format is neither RGB nor RGBA.
    #[error("unsupported image mode {mode}, expected RGB or RGBA")]
    UnsupportedImageMode { mode: String },
    /// No sprite content remains below the reserved reference rows.
    #[error("image height {height} leaves no content below {reserved} reserved rows")]
    EmptyContent { height: u32, reserved: u32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Quantize(#[from] QuantizeError),
    #[error(transparent)]
    Tile(#[from] TileError),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    State(#[from] StateError),
    /// A supplied template document could not be interpreted.
    #[error("invalid template document: {0}")]
    Template(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::Axis;

    #[test]
    fn test_stage_errors_convert() {
        let err: ConvertError =
            TileError::NotDivisible { axis: Axis::Width, image_px: 30, tile_px: 8 }.into();
        assert!(matches!(err, ConvertError::Tile(_)));
        // Transparent wrapping keeps the stage's message
        assert!(err.to_string().contains("30px"));
    }

    #[test]
    fn test_unsupported_mode_message() {
        let err = ConvertError::UnsupportedImageMode { mode: "L16".to_string() };
        assert!(err.to_string().contains("L16"));
    }
}
