//! gbsprite - sprite-sheet quantizer and GB Studio animation resource
//! generator.
//!
//! This library provides functionality to:
//! - Extract per-layer 3-color palettes from a reserved reference row
//! - Quantize a sprite sheet into fixed 3-tone layer bands
//! - Partition the sheet into tiles, frames and animation states
//! - Serialize the result as a GB Studio `.gbsres` sprite document

pub mod cli;
pub mod color;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod frames;
pub mod output;
pub mod palette;
pub mod pipeline;
pub mod quantize;
pub mod resource;
pub mod states;
pub mod tiles;
