//! The harvest orchestrator: listing → fetch → render → vision → store,
//! one draw at a time.
//!
//! Control flows strictly forward through the stages for each draw. There
//! is no parallelism and no retry: the per-draw boundary catches every
//! [`DrawError`], logs it with the draw id, counts it, and moves on. The
//! only suspension point is the fixed pause after each hosted-model call.
//!
//! ## Skip policy
//!
//! A draw whose record file already exists is skipped unless
//! [`HarvestConfig::force`] is set, in which case it is reprocessed and the
//! record fully overwritten. Both games follow the same policy.

use crate::config::HarvestConfig;
use crate::error::{DrawError, HarvestError};
use crate::game::Draw;
use crate::pipeline::listing::{fetch_announcements, Announcement};
use crate::pipeline::vision::VisionClient;
use crate::pipeline::{fetch, render};
use crate::store::DrawStore;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

/// Counters for one harvest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestReport {
    /// Draws that entered the processing chain (skipped ones excluded).
    pub attempted: usize,
    /// Records written.
    pub saved: usize,
    /// Draws whose record already existed (force off).
    pub skipped: usize,
    /// Draws that failed anywhere in their chain.
    pub failed: usize,
}

/// Run a full harvest for the configured game.
///
/// # Errors
/// Returns `Err(HarvestError)` only for fatal startup problems — missing
/// credential, unpreparable output directory. Per-draw failures are counted
/// in the returned [`HarvestReport`].
pub async fn harvest(config: &HarvestConfig) -> Result<HarvestReport, HarvestError> {
    // Credential check comes first: fail before any network or disk work.
    let vision = VisionClient::new(config)?;

    let mut store = DrawStore::open(&config.data_dir, config.game)?;

    for dir in [config.pdf_dir(), config.image_dir()] {
        std::fs::create_dir_all(&dir).map_err(|e| HarvestError::StoreIo {
            path: dir.clone(),
            source: e,
        })?;
    }

    let http = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .map_err(|e| HarvestError::Internal(format!("HTTP client: {e}")))?;

    let mut announcements =
        fetch_announcements(&http, config.game, config.pages, config.page_delay_ms).await?;
    if let Some(limit) = config.limit {
        announcements.truncate(limit);
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(announcements.len());
    }

    let mut report = HarvestReport::default();

    for announcement in &announcements {
        let id = config.game.draw_id(announcement.draw_number);

        if store.contains(&id) {
            if config.force {
                info!("[{:05}] Updating existing draw", announcement.draw_number);
            } else {
                info!("[{:05}] Skipping (already exists)", announcement.draw_number);
                report.skipped += 1;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_draw_skipped(announcement.draw_number);
                }
                continue;
            }
        }

        if let Some(ref cb) = config.progress_callback {
            cb.on_draw_start(announcement.draw_number);
        }
        report.attempted += 1;

        match process_draw(config, &http, &vision, announcement).await {
            Ok(draw) => match store.save(&draw) {
                Ok(_) => {
                    info!("[{:05}] Saved: {:?}", draw.draw_number, draw.numbers);
                    report.saved += 1;
                    if let Some(ref cb) = config.progress_callback {
                        cb.on_draw_saved(draw.draw_number, &draw.numbers);
                    }
                }
                Err(e) => {
                    warn!("{e}");
                    report.failed += 1;
                    if let Some(ref cb) = config.progress_callback {
                        cb.on_draw_failed(e.draw_number(), &e.to_string());
                    }
                }
            },
            Err(e) => {
                warn!("{e}");
                report.failed += 1;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_draw_failed(e.draw_number(), &e.to_string());
                }
            }
        }

        // Rate limiting: one pause after every model call keeps the run
        // under the API's requests-per-minute cap.
        sleep(Duration::from_millis(config.request_delay_ms)).await;
    }

    info!(
        "Harvest complete: {} attempted, {} saved, {} skipped, {} failed",
        report.attempted, report.saved, report.skipped, report.failed
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(report.saved, report.failed, report.skipped);
    }

    Ok(report)
}

/// Take one announcement through download → convert → extract → validate.
async fn process_draw(
    config: &HarvestConfig,
    http: &reqwest::Client,
    vision: &VisionClient,
    announcement: &Announcement,
) -> Result<Draw, DrawError> {
    let n = announcement.draw_number;

    let pdf_path =
        fetch::download_pdf(http, &announcement.document_url, n, &config.pdf_dir()).await?;

    let image_path =
        render::pdf_to_image(&config.converter, &pdf_path, n, &config.image_dir()).await?;

    let extraction = vision.read_draw(&image_path, config.game, n).await?;

    // The listing page's date fills in when the model reply had none.
    let date = extraction.date.or(announcement.known_date);

    let complete = extraction.numbers.len() == 6;
    match date {
        Some(date) if complete => Ok(Draw::new(config.game, n, extraction.numbers, date)),
        _ => {
            if date.is_none() {
                warn!("[{n:05}] Could not extract date");
            }
            if !complete {
                warn!(
                    "[{n:05}] Could not extract 6 numbers (got {})",
                    extraction.numbers.len()
                );
            }
            Err(DrawError::Incomplete {
                draw_number: n,
                numbers_found: extraction.numbers.len(),
                date_found: date.is_some(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameType;

    #[test]
    fn report_defaults_to_zero() {
        let r = HarvestReport::default();
        assert_eq!(r.attempted + r.saved + r.skipped + r.failed, 0);
    }

    #[tokio::test]
    async fn missing_credential_is_fatal_before_any_work() {
        // Guarantee no ambient key for this check.
        let had = std::env::var("OPENAI_API_KEY").ok();
        std::env::remove_var("OPENAI_API_KEY");

        let config = HarvestConfig::builder(GameType::Mega645)
            .data_dir("/definitely/not/writable/anywhere")
            .build()
            .unwrap();
        let err = harvest(&config).await.unwrap_err();
        // Credential is checked before the store: the unwritable data_dir
        // must never be touched.
        assert!(matches!(err, HarvestError::ApiKeyMissing));

        if let Some(key) = had {
            std::env::set_var("OPENAI_API_KEY", key);
        }
    }
}
