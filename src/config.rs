//! Configuration for a harvest run.
//!
//! All behaviour is controlled through [`HarvestConfig`], built via its
//! [`HarvestConfigBuilder`]. Keeping every knob in one struct makes it easy
//! to share the config across pipeline stages and to diff two runs when
//! their outputs differ.

use crate::error::HarvestError;
use crate::game::GameType;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// The hosted chat-completions endpoint used for extraction.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default vision model. GPT-4o reads the announcement layout reliably at
/// the default render size.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Browser-like User-Agent; the results site rejects bare clients.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Configuration for harvesting one game's draws.
///
/// Built via [`HarvestConfig::builder()`].
///
/// # Example
/// ```rust
/// use vietlott_ocr::{GameType, HarvestConfig};
///
/// let config = HarvestConfig::builder(GameType::Mega645)
///     .pages(3)
///     .limit(Some(10))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct HarvestConfig {
    /// Which game to harvest. Determines number range, listing URLs, and
    /// the per-game output directory.
    pub game: GameType,

    /// How many listing pages to walk. Default: 5.
    ///
    /// Each page carries roughly ten announcements; five pages cover the
    /// recent history a prediction dataset needs without hammering the site.
    pub pages: u32,

    /// Process at most this many draws. `None` = all discovered.
    pub limit: Option<usize>,

    /// Reprocess draws whose record already exists. Default: false.
    ///
    /// Existing records are skipped unless this is set; the overwrite is a
    /// full record replacement (useful to re-read draws saved with a wrong
    /// date by an earlier run).
    pub force: bool,

    /// Root directory for output records; the per-game subdirectory is
    /// appended. Default: `data/draws`.
    pub data_dir: PathBuf,

    /// Root for downloaded PDFs and rendered images. Default: the system
    /// temp directory. Scratch files are kept between runs so re-runs skip
    /// downloads and conversions that already happened.
    pub scratch_dir: PathBuf,

    /// API credential. `None` = read `OPENAI_API_KEY` from the environment.
    pub api_key: Option<String>,

    /// Chat-completions endpoint URL. Default: [`DEFAULT_API_URL`].
    /// Overridable for OpenAI-compatible gateways and for tests.
    pub api_url: String,

    /// Vision model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Maximum tokens the model may generate per reply. Default: 300.
    ///
    /// The expected reply is two short lines; 300 leaves room for models
    /// that narrate before answering.
    pub max_tokens: u32,

    /// Sampling temperature. Default: 0.0 — transcription wants the model
    /// deterministic and faithful to the image.
    pub temperature: f32,

    /// Per-HTTP-request timeout in seconds. Default: 30.
    pub http_timeout_secs: u64,

    /// Pause after each hosted-model call, in milliseconds. Default: 1500.
    ///
    /// The only suspension point in the pipeline; keeps the run under the
    /// API's requests-per-minute limit.
    pub request_delay_ms: u64,

    /// Pause between listing-page fetches, in milliseconds. Default: 1000.
    pub page_delay_ms: u64,

    /// External PDF rasteriser program. Default: `pdftoppm` (poppler-utils).
    pub converter: String,

    /// User-Agent header for listing and PDF requests.
    pub user_agent: String,

    /// Optional per-draw progress events (used by the CLI progress bar).
    pub progress_callback: Option<ProgressCallback>,
}

impl HarvestConfig {
    /// Create a new builder for the given game.
    pub fn builder(game: GameType) -> HarvestConfigBuilder {
        HarvestConfigBuilder {
            config: Self::new(game),
        }
    }

    /// Default configuration for the given game.
    pub fn new(game: GameType) -> Self {
        Self {
            game,
            pages: 5,
            limit: None,
            force: false,
            data_dir: PathBuf::from("data/draws"),
            scratch_dir: std::env::temp_dir(),
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 300,
            temperature: 0.0,
            http_timeout_secs: 30,
            request_delay_ms: 1500,
            page_delay_ms: 1000,
            converter: "pdftoppm".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            progress_callback: None,
        }
    }

    /// Directory for this game's output records.
    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join(self.game.dir_name())
    }

    /// Scratch directory for downloaded PDFs.
    pub fn pdf_dir(&self) -> PathBuf {
        self.scratch_dir
            .join(format!("vietlott_pdfs_{}", self.game.bracket_tag()))
    }

    /// Scratch directory for rendered images.
    pub fn image_dir(&self) -> PathBuf {
        self.scratch_dir
            .join(format!("vietlott_images_{}", self.game.bracket_tag()))
    }
}

impl fmt::Debug for HarvestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarvestConfig")
            .field("game", &self.game)
            .field("pages", &self.pages)
            .field("limit", &self.limit)
            .field("force", &self.force)
            .field("data_dir", &self.data_dir)
            .field("scratch_dir", &self.scratch_dir)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_delay_ms", &self.request_delay_ms)
            .field("converter", &self.converter)
            .finish()
    }
}

/// Builder for [`HarvestConfig`].
pub struct HarvestConfigBuilder {
    config: HarvestConfig,
}

impl HarvestConfigBuilder {
    pub fn pages(mut self, pages: u32) -> Self {
        self.config.pages = pages;
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.config.limit = limit;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.config.force = force;
        self
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = dir.into();
        self
    }

    pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.scratch_dir = dir.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn http_timeout_secs(mut self, secs: u64) -> Self {
        self.config.http_timeout_secs = secs;
        self
    }

    pub fn request_delay_ms(mut self, ms: u64) -> Self {
        self.config.request_delay_ms = ms;
        self
    }

    pub fn page_delay_ms(mut self, ms: u64) -> Self {
        self.config.page_delay_ms = ms;
        self
    }

    pub fn converter(mut self, program: impl Into<String>) -> Self {
        self.config.converter = program.into();
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<HarvestConfig, HarvestError> {
        let c = &self.config;
        if c.pages == 0 {
            return Err(HarvestError::InvalidConfig("pages must be ≥ 1".into()));
        }
        if c.max_tokens == 0 {
            return Err(HarvestError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.converter.trim().is_empty() {
            return Err(HarvestError::InvalidConfig(
                "converter program must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
