//! PNG and document output, plus output path generation.

use image::imageops::FilterType;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::resource::ResourceDocument;

/// Error type for output operations.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    image.save(path)?;
    Ok(())
}

/// Write a resource document as JSON.
pub fn write_document(
    document: &ResourceDocument,
    path: &Path,
    pretty: bool,
) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    std::fs::write(path, json)?;
    Ok(())
}

/// Scale an image by an integer factor with nearest-neighbor interpolation,
/// preserving crisp pixel edges. Factor 1 is a no-op.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor as u32, h * factor as u32, FilterType::Nearest)
}

/// Output path for the quantized sheet.
///
/// | Scenario                    | Output                      |
/// |-----------------------------|-----------------------------|
/// | No `--output`               | `{input stem}_quantized.png`|
/// | `--output dir/` (directory) | `dir/{name}.png`            |
/// | `--output file.png`         | `file.png`                  |
pub fn sheet_output_path(input: &Path, output: Option<&Path>, name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() || path.to_string_lossy().ends_with('/') => {
            path.join(format!("{name}.png"))
        }
        Some(path) => path.to_path_buf(),
        None => {
            let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("sprite");
            input.with_file_name(format!("{stem}_quantized.png"))
        }
    }
}

/// Resource document path: the sheet path with a `.gbsres` extension.
pub fn document_path_for(sheet_path: &Path) -> PathBuf {
    sheet_path.with_extension("gbsres")
}
