//! GB Studio `.gbsres` sprite document serialization.
//!
//! The document has two halves: fields this crate computes (states, frame
//! and tile layout, counts, canvas geometry) and fields it merely carries
//! (ids, names, engine metadata it does not understand). Computed fields are
//! typed; everything else rides in an explicit passthrough map so a template
//! document survives the round trip without silent drops.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::ConvertConfig;
use crate::dedupe::{DedupReport, DedupSummary};
use crate::frames::Frame;
use crate::states::AnimationState;
use crate::tiles::TileGrid;

/// One tile placement inside a frame, engine field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileEntry {
    pub id: String,
    /// Position inside the frame canvas, pixels.
    pub x: u32,
    pub y: u32,
    /// Source rectangle origin in the sheet, pixels.
    pub slice_x: u32,
    pub slice_y: u32,
    pub palette: u32,
    pub flip_x: bool,
    pub flip_y: bool,
    pub obj_palette: String,
    /// Engine palette identifier of the tile's layer.
    pub palette_index: u32,
    pub priority: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameEntry {
    pub id: String,
    pub tiles: Vec<TileEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationEntry {
    pub id: String,
    pub frames: Vec<FrameEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateEntry {
    pub id: String,
    pub name: String,
    pub animation_type: String,
    pub flip_left: bool,
    pub animations: Vec<AnimationEntry>,
}

/// The sprite resource document.
///
/// `extra` holds every caller-supplied key the core does not compute; on
/// serialization those keys are flattened back beside the typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceDocument {
    #[serde(rename = "_resourceType")]
    pub resource_type: String,
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub num_frames: usize,
    pub filename: String,
    pub checksum: String,
    pub width: u32,
    pub height: u32,
    pub states: Vec<StateEntry>,
    pub num_tiles: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub bounds_x: i32,
    pub bounds_y: i32,
    pub bounds_width: u32,
    pub bounds_height: u32,
    pub anim_speed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deduplication: Option<DedupSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything the serializer needs from earlier stages.
#[derive(Debug, Clone, Copy)]
pub struct DocumentInputs<'a> {
    pub config: &'a ConvertConfig,
    /// Grid over the stacked sheet, all layer bands included.
    pub grid: &'a TileGrid,
    /// Frames over the first layer's band of the grid.
    pub frames: &'a [Frame],
    pub states: &'a [AnimationState],
    pub dedupe: Option<&'a DedupReport>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Frame canvas extent in tiles: `(cols, rows, min_col, min_row)`.
fn frame_extent(grid: &TileGrid, frame: &Frame) -> (u32, u32, u32, u32) {
    let mut min_col = u32::MAX;
    let mut max_col = 0;
    let mut min_row = u32::MAX;
    let mut max_row = 0;
    for &tile in &frame.tiles {
        let (row, col) = grid.position(tile);
        min_col = min_col.min(col);
        max_col = max_col.max(col);
        min_row = min_row.min(row);
        max_row = max_row.max(row);
    }
    if frame.tiles.is_empty() {
        return (1, 1, 0, 0);
    }
    (max_col - min_col + 1, max_row - min_row + 1, min_col, min_row)
}

/// Emit the tiles of one frame, every layer composited at the same canvas
/// position.
///
/// Frame tile indices address the first layer's band of the grid; the
/// matching tile of layer `n` sits `n * band_tiles` further into the
/// row-major stacked grid, so its slice origin lands in that layer's band
/// while `x`/`y` stay those of the cell. Palette ids follow the layer.
fn build_frame_entry(inputs: &DocumentInputs, frame: &Frame, flip: bool) -> FrameEntry {
    let grid = inputs.grid;
    let config = inputs.config;
    let layers = config.layer_count();
    let band_tiles = grid.len() / layers;
    let (frame_cols, _, min_col, min_row) = frame_extent(grid, frame);

    let mut tiles = Vec::with_capacity(frame.tiles.len() * layers);
    for &tile in &frame.tiles {
        let (row, col) = grid.position(tile);
        let local_col = col - min_col;
        let x = if flip {
            (frame_cols - 1 - local_col) * grid.tile_width()
        } else {
            local_col * grid.tile_width()
        };
        let y = (row - min_row) * grid.tile_height();

        for layer in 0..layers {
            let stacked = layer * band_tiles + tile;
            let source = inputs.dedupe.map_or(stacked, |report| report.canonical(stacked));
            let (slice_x, slice_y) = grid.slice_origin(source);

            tiles.push(TileEntry {
                id: new_id(),
                x,
                y,
                slice_x,
                slice_y,
                palette: 0,
                flip_x: flip,
                flip_y: false,
                obj_palette: "OBP0".to_string(),
                palette_index: config.layer_palettes[layer],
                priority: false,
            });
        }
    }

    FrameEntry { id: new_id(), tiles }
}

/// Build the document's computed fields from the pipeline's outputs.
pub fn build_document(inputs: &DocumentInputs) -> ResourceDocument {
    let config = inputs.config;
    let grid = inputs.grid;

    let (canvas_width, canvas_height) = match inputs.frames.first() {
        Some(first) => {
            let (cols, rows, _, _) = frame_extent(grid, first);
            (cols * grid.tile_width(), rows * grid.tile_height())
        }
        None => (grid.tile_width(), grid.tile_height()),
    };

    let mut num_frames = 0;
    let mut num_tiles = 0;
    let states = inputs
        .states
        .iter()
        .map(|state| {
            let animations = state
                .sequences()
                .into_iter()
                .map(|(frame_indices, flip)| {
                    let frames = frame_indices
                        .into_iter()
                        .map(|fi| {
                            let entry = build_frame_entry(inputs, &inputs.frames[fi], flip);
                            num_frames += 1;
                            num_tiles += entry.tiles.len();
                            entry
                        })
                        .collect();
                    AnimationEntry { id: new_id(), frames }
                })
                .collect();

            StateEntry {
                id: new_id(),
                name: format!("state_{}", state.index),
                animation_type: state.descriptor.kind_name().to_string(),
                flip_left: state.flip_left(),
                animations,
            }
        })
        .collect();

    ResourceDocument {
        resource_type: "sprite".to_string(),
        id: new_id(),
        name: config.name.clone(),
        symbol: config.symbol(),
        num_frames,
        filename: config.filename(),
        checksum: config.checksum.clone(),
        width: grid.cols() * grid.tile_width(),
        height: grid.rows() * grid.tile_height(),
        states,
        num_tiles,
        canvas_width,
        canvas_height,
        bounds_x: 0,
        bounds_y: 0,
        bounds_width: canvas_width,
        bounds_height: canvas_height,
        anim_speed: config.anim_speed,
        deduplication: inputs.dedupe.map(|report| report.summary.clone()),
        extra: Map::new(),
    }
}

impl ResourceDocument {
    /// Merge a caller-supplied template under this document.
    ///
    /// Identity fields the core does not derive (`_resourceType`, `id`,
    /// `checksum`, `width`, `height`) are taken from the template when it
    /// provides them, and every key the core does not understand is carried
    /// through unchanged. Fields the core owns (states, counts, canvas and
    /// bounds geometry, name-derived fields) keep their computed values.
    pub fn overlay(mut self, template: &Value) -> Result<ResourceDocument, serde_json::Error> {
        let template: ResourceDocument = serde_json::from_value(template.clone())?;
        if !template.resource_type.is_empty() {
            self.resource_type = template.resource_type;
        }
        if !template.id.is_empty() {
            self.id = template.id;
        }
        if !template.checksum.is_empty() {
            self.checksum = template.checksum;
        }
        if template.width != 0 {
            self.width = template.width;
        }
        if template.height != 0 {
            self.height = template.height;
        }
        self.extra = template.extra;
        Ok(self)
    }
}
