//! Command-line interface implementation.
//!
//! Thin glue: parses arguments into a [`ConvertConfig`], runs the pipeline,
//! writes the two artifacts. Every decision lives in the core modules.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{ConvertConfig, DEFAULT_ANIM_SPEED, DEFAULT_RESERVED_ROWS};
use crate::frames::FrameLayout;
use crate::output::{document_path_for, save_png, scale_image, sheet_output_path, write_document};
use crate::pipeline::convert;
use crate::quantize::MatchMode;
use crate::states::parse_state_list;

const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// gbsprite - quantize sprite sheets into 3-tone layers and generate GB
/// Studio animation resources
#[derive(Parser)]
#[command(name = "gbspr")]
#[command(about = "Quantize sprite sheets and generate GB Studio animation resources")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a sprite sheet PNG into a quantized sheet plus .gbsres document
    Convert {
        /// Input PNG with the palette reference row at the top
        input: PathBuf,

        /// Output file or directory for the quantized sheet.
        /// The document lands beside it with a .gbsres extension.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sprite name; defaults to the input file stem
        #[arg(short, long)]
        name: Option<String>,

        #[arg(long, default_value = "8")]
        tile_width: u32,

        #[arg(long, default_value = "16")]
        tile_height: u32,

        #[arg(long, default_value = "2")]
        tiles_per_frame: usize,

        /// Tile-to-frame layout: sequential or interleaved
        #[arg(long, default_value = "sequential")]
        layout: FrameLayout,

        /// Comma-separated state list, e.g. "fixed,multi:4,multi_movement:8"
        #[arg(long, default_value = "fixed")]
        states: String,

        /// Comma-separated engine palette ids, one per layer
        #[arg(long, default_value = "1")]
        palettes: String,

        /// Existing .gbsres document to overlay (preserves ids and metadata)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Fail on colors outside the palette instead of nearest-matching
        #[arg(long)]
        exact: bool,

        /// Alpha below this becomes transparent
        #[arg(long, default_value = "8")]
        alpha_threshold: u8,

        /// Rows reserved at the top for the palette encoding
        #[arg(long, default_value_t = DEFAULT_RESERVED_ROWS)]
        reserved_rows: u32,

        /// Checksum to record in the document
        #[arg(long, default_value = "")]
        checksum: String,

        /// Redirect duplicate tiles to their first occurrence
        #[arg(long)]
        dedupe: bool,

        /// Scale the written sheet by an integer factor (preview only)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: u8,

        /// Compact JSON output instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
}

/// Run the CLI application.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            name,
            tile_width,
            tile_height,
            tiles_per_frame,
            layout,
            states,
            palettes,
            template,
            exact,
            alpha_threshold,
            reserved_rows,
            checksum,
            dedupe,
            scale,
            compact,
        } => {
            let name = name.unwrap_or_else(|| {
                input
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("sprite")
                    .to_string()
            });

            let state_list = match parse_state_list(&states) {
                Ok(list) => list,
                Err(e) => {
                    eprintln!("Error: invalid --states: {e}");
                    return ExitCode::from(EXIT_INVALID_ARGS);
                }
            };
            let layer_palettes = match parse_palette_list(&palettes) {
                Ok(list) => list,
                Err(e) => {
                    eprintln!("Error: invalid --palettes: {e}");
                    return ExitCode::from(EXIT_INVALID_ARGS);
                }
            };

            let config = ConvertConfig {
                name,
                tile_width,
                tile_height,
                tiles_per_frame,
                layout,
                states: state_list,
                layer_palettes,
                match_mode: if exact { MatchMode::Exact } else { MatchMode::NearestFallback },
                alpha_threshold,
                reserved_rows,
                anim_speed: DEFAULT_ANIM_SPEED,
                checksum,
                dedupe,
            };

            run_convert(&input, output.as_deref(), &config, template.as_deref(), scale, !compact)
        }
    }
}

/// Parse a comma-separated engine palette id list.
fn parse_palette_list(list: &str) -> Result<Vec<u32>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u32>().map_err(|_| format!("'{s}' is not a palette id")))
        .collect()
}

/// Execute the convert command.
fn run_convert(
    input: &Path,
    output: Option<&Path>,
    config: &ConvertConfig,
    template_path: Option<&Path>,
    scale: u8,
    pretty: bool,
) -> ExitCode {
    let image = match image::open(input) {
        Ok(img) => img,
        Err(e) => {
            eprintln!("Error: cannot open input image '{}': {e}", input.display());
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let template = match template_path {
        Some(path) => match read_template(path) {
            Ok(value) => Some(value),
            Err(e) => {
                eprintln!("Error: cannot read template '{}': {e}", path.display());
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        },
        None => None,
    };

    let result = match convert(&image, config, template.as_ref()) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let sheet_path = sheet_output_path(input, output, &config.name);
    let document_path = document_path_for(&sheet_path);

    let sheet = scale_image(result.sheet, scale);
    if let Err(e) = save_png(&sheet, &sheet_path) {
        eprintln!("Error: cannot write '{}': {e}", sheet_path.display());
        return ExitCode::from(EXIT_ERROR);
    }
    if let Err(e) = write_document(&result.document, &document_path, pretty) {
        eprintln!("Error: cannot write '{}': {e}", document_path.display());
        return ExitCode::from(EXIT_ERROR);
    }

    println!(
        "{}: {} layers, {} frames, {} tiles -> {} + {}",
        config.name,
        result.palettes.len(),
        result.document.num_frames,
        result.document.num_tiles,
        sheet_path.display(),
        document_path.display()
    );
    ExitCode::SUCCESS
}

fn read_template(path: &Path) -> Result<serde_json::Value, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_palette_list() {
        assert_eq!(parse_palette_list("1,2").unwrap(), vec![1, 2]);
        assert_eq!(parse_palette_list(" 3 , 7 ").unwrap(), vec![3, 7]);
        assert!(parse_palette_list("1,x").is_err());
    }

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "gbspr",
            "convert",
            "hero.png",
            "--states",
            "fixed,multi:4",
            "--palettes",
            "1,2",
            "--layout",
            "interleaved",
            "--checksum",
            "abc123",
            "--dedupe",
        ])
        .unwrap();
        let Commands::Convert { input, states, palettes, layout, checksum, dedupe, .. } =
            cli.command;
        assert_eq!(input, PathBuf::from("hero.png"));
        assert_eq!(states, "fixed,multi:4");
        assert_eq!(palettes, "1,2");
        assert_eq!(layout, FrameLayout::Interleaved);
        assert_eq!(checksum, "abc123");
        assert!(dedupe);
    }

    #[test]
    fn test_cli_rejects_bad_scale() {
        let result =
            Cli::try_parse_from(["gbspr", "convert", "hero.png", "--scale", "99"]);
        assert!(result.is_err());
    }
}
