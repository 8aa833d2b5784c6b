//! Document fetch: announcement PDF URL → local scratch file.
//!
//! Downloads are keyed by draw number (`draw_01295.pdf`) and skipped when
//! the file already exists, so an interrupted run resumes without
//! re-downloading. Scratch files are never deleted here; the converter
//! reads them in place.

use crate::error::DrawError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Download the announcement PDF for a draw, unless already present.
///
/// Returns the local path either way.
pub async fn download_pdf(
    http: &reqwest::Client,
    url: &str,
    draw_number: u32,
    pdf_dir: &Path,
) -> Result<PathBuf, DrawError> {
    let pdf_path = pdf_dir.join(format!("draw_{draw_number:05}.pdf"));

    if pdf_path.exists() {
        debug!("PDF already downloaded: {}", pdf_path.display());
        return Ok(pdf_path);
    }

    info!("[{draw_number:05}] Downloading PDF");

    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| DrawError::Download {
            draw_number,
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(DrawError::Download {
            draw_number,
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response.bytes().await.map_err(|e| DrawError::Download {
        draw_number,
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    tokio::fs::write(&pdf_path, &bytes)
        .await
        .map_err(|e| DrawError::Io {
            draw_number,
            path: pdf_path.clone(),
            source: e,
        })?;

    debug!("Saved {} bytes to {}", bytes.len(), pdf_path.display());
    Ok(pdf_path)
}
