//! # vietlott-ocr
//!
//! Harvest Vietlott lottery draw results from the official PDF
//! announcements using a vision-capable language model.
//!
//! ## Why a vision model?
//!
//! The winning numbers are published as styled PDF announcements — the
//! digits sit inside decorative circles that classic text extraction mangles
//! or drops. Rasterising the page and letting a VLM read it as a human would
//! is the reliable path to `Date:` and `Numbers:` lines we can parse.
//!
//! ## Pipeline Overview
//!
//! ```text
//! results site
//!  │
//!  ├─ 1. Listing  walk paginated announcement pages, regex out PDF links
//!  ├─ 2. Fetch    download each announcement PDF (skip if cached)
//!  ├─ 3. Render   rasterise to PNG via pdftoppm (skip if cached)
//!  ├─ 4. Vision   one hosted-model call per draw, fixed prompt, temp 0
//!  ├─ 5. Parse    free-text reply → 6 bounded integers + date
//!  └─ 6. Store    one JSON record per draw, skip-unless-forced
//! ```
//!
//! Draws are processed strictly one at a time with a fixed pause after each
//! model call; a failed draw is logged and counted, never retried, and never
//! aborts the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vietlott_ocr::{harvest, GameType, HarvestConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from OPENAI_API_KEY
//!     let config = HarvestConfig::builder(GameType::Mega645)
//!         .limit(Some(10))
//!         .build()?;
//!     let report = harvest(&config).await?;
//!     println!("saved {} draws ({} failed)", report.saved, report.failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Requirements
//!
//! | What | Why |
//! |------|-----|
//! | `OPENAI_API_KEY` | hosted vision model credential (fatal if absent) |
//! | `pdftoppm` on PATH | PDF → PNG rasterisation (poppler-utils) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod game;
pub mod harvest;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod sample;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{HarvestConfig, HarvestConfigBuilder};
pub use error::{DrawError, HarvestError};
pub use game::{Draw, GameType};
pub use harvest::{harvest, HarvestReport};
pub use pipeline::listing::Announcement;
pub use pipeline::parse::Extraction;
pub use progress::{HarvestProgressCallback, NoopProgressCallback, ProgressCallback};
pub use sample::generate_samples;
pub use store::DrawStore;
