//! Per-invocation conversion configuration.
//!
//! One immutable value constructed before the pipeline runs and threaded
//! through every stage. No stage reads configuration from anywhere else.

use thiserror::Error;

use crate::frames::FrameLayout;
use crate::quantize::{MatchMode, QuantizeOptions};
use crate::states::StateDescriptor;

/// Rows at the top of the input reserved for palette encoding. Row 0 holds
/// the triplets; the remainder pads the content region to a tile boundary.
pub const DEFAULT_RESERVED_ROWS: u32 = 8;

/// Default engine animation speed for generated documents.
pub const DEFAULT_ANIM_SPEED: u32 = 15;

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tile dimensions must be positive")]
    ZeroTileSize,
    #[error("tiles per frame must be positive")]
    ZeroTilesPerFrame,
    #[error("at least one animation state must be declared")]
    NoStates,
    #[error("at least one layer palette must be specified")]
    NoLayers,
}

/// Everything one conversion needs, fixed up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Sprite name; drives `filename` and `symbol` in the document.
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tiles_per_frame: usize,
    pub layout: FrameLayout,
    /// Declared animation states, in order.
    pub states: Vec<StateDescriptor>,
    /// Engine palette identifiers, one per layer. Opaque pass-through ids,
    /// distinct from the RGB triplets extracted for quantization.
    pub layer_palettes: Vec<u32>,
    pub match_mode: MatchMode,
    pub alpha_threshold: u8,
    /// Rows cropped from the top before quantization.
    pub reserved_rows: u32,
    pub anim_speed: u32,
    /// Caller-supplied document checksum; empty leaves the field blank.
    pub checksum: String,
    /// Redirect duplicate tile slices to their first occurrence.
    pub dedupe: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            name: "sprite".to_string(),
            tile_width: 8,
            tile_height: 16,
            tiles_per_frame: 2,
            layout: FrameLayout::Sequential,
            states: vec![StateDescriptor::Fixed],
            layer_palettes: vec![1],
            match_mode: MatchMode::default(),
            alpha_threshold: 8,
            reserved_rows: DEFAULT_RESERVED_ROWS,
            anim_speed: DEFAULT_ANIM_SPEED,
            checksum: String::new(),
            dedupe: false,
        }
    }
}

impl ConvertConfig {
    /// Check the invariants no later stage re-checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        if self.tiles_per_frame == 0 {
            return Err(ConfigError::ZeroTilesPerFrame);
        }
        if self.states.is_empty() {
            return Err(ConfigError::NoStates);
        }
        if self.layer_palettes.is_empty() {
            return Err(ConfigError::NoLayers);
        }
        Ok(())
    }

    /// Number of quantization layers.
    pub fn layer_count(&self) -> usize {
        self.layer_palettes.len()
    }

    /// Quantizer settings derived from this configuration.
    pub fn quantize_options(&self) -> QuantizeOptions {
        QuantizeOptions { mode: self.match_mode, alpha_threshold: self.alpha_threshold }
    }

    /// `filename` field for the document.
    pub fn filename(&self) -> String {
        format!("{}.png", self.name)
    }

    /// `symbol` field for the document, spaces replaced like the engine does.
    pub fn symbol(&self) -> String {
        format!("sprite_{}", self.name.replace(' ', "_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ConvertConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        let config = ConvertConfig { tile_width: 0, ..Default::default() };
        assert_eq!(config.validate().unwrap_err(), ConfigError::ZeroTileSize);
        let config = ConvertConfig { tile_height: 0, ..Default::default() };
        assert_eq!(config.validate().unwrap_err(), ConfigError::ZeroTileSize);
    }

    #[test]
    fn test_zero_tiles_per_frame_rejected() {
        let config = ConvertConfig { tiles_per_frame: 0, ..Default::default() };
        assert_eq!(config.validate().unwrap_err(), ConfigError::ZeroTilesPerFrame);
    }

    #[test]
    fn test_empty_states_rejected() {
        let config = ConvertConfig { states: vec![], ..Default::default() };
        assert_eq!(config.validate().unwrap_err(), ConfigError::NoStates);
    }

    #[test]
    fn test_empty_layers_rejected() {
        let config = ConvertConfig { layer_palettes: vec![], ..Default::default() };
        assert_eq!(config.validate().unwrap_err(), ConfigError::NoLayers);
    }

    #[test]
    fn test_identity_fields() {
        let config = ConvertConfig { name: "hero walk".to_string(), ..Default::default() };
        assert_eq!(config.filename(), "hero walk.png");
        assert_eq!(config.symbol(), "sprite_hero_walk");
    }

    #[test]
    fn test_quantize_options_carry_settings() {
        let config = ConvertConfig {
            match_mode: MatchMode::Exact,
            alpha_threshold: 100,
            ..Default::default()
        };
        let options = config.quantize_options();
        assert_eq!(options.mode, MatchMode::Exact);
        assert_eq!(options.alpha_threshold, 100);
    }
}
