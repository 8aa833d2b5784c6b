//! Progress-callback trait for per-draw harvest events.
//!
//! Inject an [`Arc<dyn HarvestProgressCallback>`] via
//! [`crate::config::HarvestConfigBuilder::progress_callback`] to receive
//! events as the pipeline works through the discovered draws. The callback
//! approach keeps the library ignorant of terminals: the CLI forwards events
//! to an indicatif bar, other hosts can forward them anywhere else.
//!
//! The pipeline is single-threaded, but the trait is `Send + Sync` so
//! callbacks can be shared with other tasks (e.g. a status endpoint).

use std::sync::Arc;

/// Called by the harvest loop as it processes each discovered draw.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait HarvestProgressCallback: Send + Sync {
    /// Called once after listing discovery, before any draw is processed.
    ///
    /// `total` is the number of draws that will be attempted or skipped.
    fn on_run_start(&self, total: usize) {
        let _ = total;
    }

    /// Called when a draw's record already exists and `force` is off.
    fn on_draw_skipped(&self, draw_number: u32) {
        let _ = draw_number;
    }

    /// Called just before a draw enters the download→convert→extract chain.
    fn on_draw_start(&self, draw_number: u32) {
        let _ = draw_number;
    }

    /// Called when a draw's record was written.
    ///
    /// `numbers` are the six extracted winning numbers, ascending.
    fn on_draw_saved(&self, draw_number: u32, numbers: &[u8]) {
        let _ = (draw_number, numbers);
    }

    /// Called when a draw failed anywhere in its chain.
    fn on_draw_failed(&self, draw_number: u32, error: &str) {
        let _ = (draw_number, error);
    }

    /// Called once after every draw has been attempted or skipped.
    fn on_run_complete(&self, saved: usize, failed: usize, skipped: usize) {
        let _ = (saved, failed, skipped);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl HarvestProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::HarvestConfig`].
pub type ProgressCallback = Arc<dyn HarvestProgressCallback>;
