//! PDF rasterisation: announcement PDF → single PNG via an external
//! converter subprocess.
//!
//! The announcements are single-page documents, so `pdftoppm -png
//! -singlefile` produces exactly one `<base>.png`. Shelling out keeps the
//! crate free of a PDF engine dependency; poppler-utils is available on
//! every platform this runs on. The subprocess goes through
//! `tokio::process` so the (rarely long) conversion doesn't block the
//! runtime.

use crate::error::DrawError;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Rasterise a draw's PDF to `draw_NNNNN.png`, unless already rendered.
///
/// Idempotent: when the target image exists the converter is not spawned
/// and the existing path is returned. A non-zero converter exit, or a clean
/// exit that produced no file, is a per-draw error.
pub async fn pdf_to_image(
    converter: &str,
    pdf_path: &Path,
    draw_number: u32,
    image_dir: &Path,
) -> Result<PathBuf, DrawError> {
    let image_base = image_dir.join(format!("draw_{draw_number:05}"));
    let image_path = image_base.with_extension("png");

    if image_path.exists() {
        debug!("Image already rendered: {}", image_path.display());
        return Ok(image_path);
    }

    info!("[{draw_number:05}] Converting PDF to image");

    let output = Command::new(converter)
        .arg("-png")
        .arg("-singlefile")
        .arg(pdf_path)
        .arg(&image_base)
        .output()
        .await
        .map_err(|e| DrawError::ConverterFailed {
            draw_number,
            converter: converter.to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(DrawError::ConverterFailed {
            draw_number,
            converter: converter.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    if !image_path.exists() {
        return Err(DrawError::ImageMissing {
            draw_number,
            path: image_path,
        });
    }

    debug!("Rendered {}", image_path.display());
    Ok(image_path)
}
