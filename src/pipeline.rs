//! The conversion pipeline, leaves first: palettes → bands → tiles → frames
//! → states → document. Each stage is a pure function over the previous
//! stage's output; this module only sequences them.

use image::{DynamicImage, RgbaImage};
use serde_json::Value;

use crate::config::ConvertConfig;
use crate::dedupe::dedupe_tiles;
use crate::error::ConvertError;
use crate::frames;
use crate::palette::{self, PaletteLayer};
use crate::quantize;
use crate::resource::{self, DocumentInputs, ResourceDocument};
use crate::states;
use crate::tiles::{Axis, TileError, TileGrid};

/// Everything one conversion produces.
#[derive(Debug, Clone)]
pub struct ConvertOutput {
    /// The quantized sheet: per-layer bands stacked vertically, band 0 on top.
    pub sheet: RgbaImage,
    /// The individual per-layer bands, in layer order.
    pub bands: Vec<RgbaImage>,
    /// The RGB triplets extracted from the reference row.
    pub palettes: Vec<PaletteLayer>,
    /// The animation resource document.
    pub document: ResourceDocument,
}

/// Run the full conversion.
///
/// The input must be RGB or RGBA. Row 0 carries the palette encoding and the
/// top `reserved_rows` rows are excluded from sprite content. An optional
/// template document contributes the fields the core does not compute.
pub fn convert(
    image: &DynamicImage,
    config: &ConvertConfig,
    template: Option<&Value>,
) -> Result<ConvertOutput, ConvertError> {
    config.validate()?;

    let rgba = match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image.to_rgba8(),
        other => {
            return Err(ConvertError::UnsupportedImageMode {
                mode: format!("{:?}", other.color()),
            })
        }
    };

    let palettes = palette::extract_palettes(&rgba, config.layer_count())?;

    if rgba.height() <= config.reserved_rows {
        return Err(ConvertError::EmptyContent {
            height: rgba.height(),
            reserved: config.reserved_rows,
        });
    }
    let content = image::imageops::crop_imm(
        &rgba,
        0,
        config.reserved_rows,
        rgba.width(),
        rgba.height() - config.reserved_rows,
    )
    .to_image();

    let bands = quantize::quantize_layers(&content, &palettes, &config.quantize_options())?;
    let sheet = quantize::stack_bands(&bands);

    // Each layer band must tile on its own, not just the stacked sheet, or
    // tiles would straddle band boundaries.
    if content.height() % config.tile_height != 0 {
        return Err(TileError::NotDivisible {
            axis: Axis::Height,
            image_px: content.height(),
            tile_px: config.tile_height,
        }
        .into());
    }

    let grid = TileGrid::split(&sheet, config.tile_width, config.tile_height)?;
    // Frames span one band; the serializer composites the other layers onto
    // each frame at the same positions, so frame count ignores layer count.
    let band_tiles = grid.len() / config.layer_count();
    let frame_set = frames::assemble(band_tiles, config.tiles_per_frame, config.layout)?;
    let state_set = states::build_states(&config.states, frame_set.len())?;
    let report = if config.dedupe { Some(dedupe_tiles(&grid)) } else { None };

    let mut document = resource::build_document(&DocumentInputs {
        config,
        grid: &grid,
        frames: &frame_set,
        states: &state_set,
        dedupe: report.as_ref(),
    });
    if let Some(template) = template {
        document = document.overlay(template)?;
    }

    Ok(ConvertOutput { sheet, bands, palettes, document })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{opaque, TRANSPARENT_MARKER};
    use crate::states::StateDescriptor;
    use image::Rgb;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const GRAY: Rgb<u8> = Rgb([128, 128, 128]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    /// Input sheet: reference row + marker padding on top, content below.
    fn input_sheet(width: u32, content_height: u32, reserved: u32) -> DynamicImage {
        let mut img = RgbaImage::from_pixel(
            width,
            reserved + content_height,
            opaque(TRANSPARENT_MARKER),
        );
        img.put_pixel(0, 0, opaque(WHITE));
        img.put_pixel(1, 0, opaque(GRAY));
        img.put_pixel(2, 0, opaque(BLACK));
        // Content: alternate white and gray columns
        for y in reserved..reserved + content_height {
            for x in 0..width {
                let c = if x % 2 == 0 { WHITE } else { GRAY };
                img.put_pixel(x, y, opaque(c));
            }
        }
        DynamicImage::ImageRgba8(img)
    }

    fn config() -> ConvertConfig {
        ConvertConfig {
            tile_width: 8,
            tile_height: 8,
            tiles_per_frame: 2,
            states: vec![StateDescriptor::Fixed, StateDescriptor::Multi { frames: 3 }],
            reserved_rows: 8,
            ..Default::default()
        }
    }

    #[test]
    fn test_full_pipeline() {
        // 32x16 content -> 8 tiles -> 4 frames -> fixed(1) + multi(3)
        let image = input_sheet(32, 16, 8);
        let output = convert(&image, &config(), None).unwrap();

        assert_eq!(output.sheet.dimensions(), (32, 16));
        assert_eq!(output.bands.len(), 1);
        assert_eq!(output.palettes.len(), 1);
        assert_eq!(output.palettes[0].light, WHITE);
        assert_eq!(output.document.states.len(), 2);
        assert_eq!(output.document.num_frames, 4);
        assert_eq!(output.document.num_tiles, 8);
    }

    #[test]
    fn test_unsupported_mode() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::new(8, 16));
        let err = convert(&gray, &config(), None).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedImageMode { .. }));
    }

    #[test]
    fn test_rgb_input_accepted() {
        let image = DynamicImage::ImageRgb8(input_sheet(32, 16, 8).to_rgb8());
        assert!(convert(&image, &config(), None).is_ok());
    }

    #[test]
    fn test_indivisible_width_fails() {
        // 30 wide: palette extraction still works (one segment), tiling fails
        let image = input_sheet(30, 16, 8);
        let err = convert(&image, &config(), None).unwrap_err();
        assert!(matches!(err, ConvertError::Tile(_)));
    }

    #[test]
    fn test_too_many_states_fails() {
        let mut cfg = config();
        cfg.states.push(StateDescriptor::Fixed);
        let image = input_sheet(32, 16, 8);
        let err = convert(&image, &cfg, None).unwrap_err();
        assert!(matches!(err, ConvertError::State(_)));
    }

    #[test]
    fn test_no_content_below_reserved_rows() {
        let mut img = RgbaImage::from_pixel(8, 8, opaque(TRANSPARENT_MARKER));
        img.put_pixel(0, 0, opaque(WHITE));
        img.put_pixel(1, 0, opaque(GRAY));
        img.put_pixel(2, 0, opaque(BLACK));
        let err =
            convert(&DynamicImage::ImageRgba8(img), &config(), None).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyContent { height: 8, reserved: 8 }));
    }

    #[test]
    fn test_deterministic_pixels() {
        let image = input_sheet(32, 16, 8);
        let a = convert(&image, &config(), None).unwrap();
        let b = convert(&image, &config(), None).unwrap();
        assert_eq!(a.sheet, b.sheet);
        // Document ids are fresh per invocation; layout is not
        assert_eq!(a.document.num_tiles, b.document.num_tiles);
    }
}
