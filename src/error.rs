//! Error types for the vietlott-ocr library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`HarvestError`] — **Fatal**: the run cannot proceed at all (missing
//!   API credential, unwritable output directory, invalid configuration).
//!   Returned as `Err(HarvestError)` from the top-level entry points before
//!   any draw is attempted.
//!
//! * [`DrawError`] — **Non-fatal**: a single draw failed (download glitch,
//!   converter exit, incomplete model reply). Logged with the draw id,
//!   counted in the run report, and the loop moves on to the next draw.
//!
//! No failure is retried anywhere; every [`DrawError`] is terminal for that
//! single draw only.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the vietlott-ocr library.
///
/// Per-draw failures use [`DrawError`] and are counted in
/// [`crate::harvest::HarvestReport`] rather than propagated here.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// No API credential in config or environment. Aborts before any work.
    #[error(
        "OpenAI API key not found.\n\
Get your API key from: https://platform.openai.com/api-keys\n\
Then set it as: export OPENAI_API_KEY='your-api-key-here'"
    )]
    ApiKeyMissing,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not create or scan the output directory at startup.
    #[error("Failed to prepare output directory '{path}': {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sample generator needs at least one existing record to extend.
    #[error(
        "No existing draw records found in '{dir}'.\n\
The sample generator extends real data; harvest at least one draw first."
    )]
    NoBaseDraw { dir: PathBuf },

    /// An existing record could not be parsed as a draw.
    #[error("Corrupt draw record '{path}': {detail}")]
    CorruptRecord { path: PathBuf, detail: String },

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single draw.
///
/// The orchestrator catches these at the per-draw boundary: the draw is
/// counted as failed and processing continues with the next one.
#[derive(Debug, Error)]
pub enum DrawError {
    /// PDF download failed (network error or non-200 status).
    #[error("draw {draw_number:05}: failed to download '{url}': {reason}")]
    Download {
        draw_number: u32,
        url: String,
        reason: String,
    },

    /// External converter exited non-zero.
    #[error("draw {draw_number:05}: {converter} failed: {stderr}")]
    ConverterFailed {
        draw_number: u32,
        converter: String,
        stderr: String,
    },

    /// Converter exited cleanly but the expected image never appeared.
    #[error("draw {draw_number:05}: image not created: {path}")]
    ImageMissing { draw_number: u32, path: PathBuf },

    /// Vision API call failed (network error, non-200, or empty reply).
    #[error("draw {draw_number:05}: vision API error: {detail}")]
    Api { draw_number: u32, detail: String },

    /// The model reply did not yield 6 numbers and a date.
    #[error(
        "draw {draw_number:05}: incomplete extraction ({numbers_found} of 6 numbers, date found: {date_found})"
    )]
    Incomplete {
        draw_number: u32,
        numbers_found: usize,
        date_found: bool,
    },

    /// The record could not be written.
    #[error("draw {draw_number:05}: failed to write record '{path}': {source}")]
    Persist {
        draw_number: u32,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Scratch-file I/O (PDF write, image read) failed.
    #[error("draw {draw_number:05}: I/O error on '{path}': {source}")]
    Io {
        draw_number: u32,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DrawError {
    /// Draw number this error belongs to, for per-draw logging.
    pub fn draw_number(&self) -> u32 {
        match self {
            DrawError::Download { draw_number, .. }
            | DrawError::ConverterFailed { draw_number, .. }
            | DrawError::ImageMissing { draw_number, .. }
            | DrawError::Api { draw_number, .. }
            | DrawError::Incomplete { draw_number, .. }
            | DrawError::Persist { draw_number, .. }
            | DrawError::Io { draw_number, .. } => *draw_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_missing_mentions_remediation() {
        let msg = HarvestError::ApiKeyMissing.to_string();
        assert!(msg.contains("OPENAI_API_KEY"), "got: {msg}");
        assert!(msg.contains("platform.openai.com"), "got: {msg}");
    }

    #[test]
    fn incomplete_display_both_ways() {
        let e = DrawError::Incomplete {
            draw_number: 42,
            numbers_found: 4,
            date_found: false,
        };
        let msg = e.to_string();
        assert!(msg.contains("00042"), "got: {msg}");
        assert!(msg.contains("4 of 6 numbers"), "got: {msg}");
        assert!(msg.contains("date found: false"), "got: {msg}");

        let e = DrawError::Incomplete {
            draw_number: 42,
            numbers_found: 6,
            date_found: true,
        };
        assert!(e.to_string().contains("date found: true"));
    }

    #[test]
    fn converter_failed_display() {
        let e = DrawError::ConverterFailed {
            draw_number: 7,
            converter: "pdftoppm".into(),
            stderr: "Syntax Error: couldn't read xref table".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("pdftoppm"));
        assert!(msg.contains("xref"));
    }

    #[test]
    fn draw_number_accessor_covers_all_variants() {
        let e = DrawError::ImageMissing {
            draw_number: 9,
            path: PathBuf::from("/tmp/draw_00009.png"),
        };
        assert_eq!(e.draw_number(), 9);
    }
}
