//! CLI binary for vietlott-ocr.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `HarvestConfig`, drives the interactive draw-count prompt, and renders
//! per-draw progress.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vietlott_ocr::{
    generate_samples, harvest, GameType, HarvestConfig, HarvestProgressCallback, ProgressCallback,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar across the discovered draws with a
/// per-draw log line above it.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} draws  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Harvesting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl HarvestProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total} draws…"))
        ));
    }

    fn on_draw_start(&self, draw_number: u32) {
        self.bar.set_message(format!("draw {draw_number:05}"));
    }

    fn on_draw_saved(&self, draw_number: u32, numbers: &[u8]) {
        self.bar.println(format!(
            "  {} {draw_number:05}  {}",
            green("✓"),
            dim(&format!("{numbers:?}"))
        ));
        self.bar.inc(1);
    }

    fn on_draw_skipped(&self, draw_number: u32) {
        self.bar
            .println(format!("  {} {draw_number:05}  already saved", dim("·")));
        self.bar.inc(1);
    }

    fn on_draw_failed(&self, draw_number: u32, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };
        self.bar
            .println(format!("  {} {draw_number:05}  {}", red("✗"), red(&msg)));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, _saved: usize, _failed: usize, _skipped: usize) {
        self.bar.finish_and_clear();
    }
}

// ── Args ─────────────────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Harvest recent Mega 6/45 draws (asks how many to process)
  vietlott-ocr harvest --game mega

  # Harvest everything discovered on 3 pages, no prompt
  vietlott-ocr harvest --game power --pages 3 --yes

  # Re-read draws already on disk (e.g. to fix dates)
  vietlott-ocr harvest --game power --force --yes

  # Pad the dataset with 22 placeholder draws
  vietlott-ocr seed --game power --count 22

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY   hosted vision model credential (required for harvest)

SETUP:
  1. Install poppler-utils (provides pdftoppm)
  2. export OPENAI_API_KEY=sk-...
  3. vietlott-ocr harvest --game mega
"#;

/// Harvest Vietlott draw results from PDF announcements using Vision LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "vietlott-ocr",
    version,
    about = "Harvest Vietlott draw results from PDF announcements using Vision LLMs",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover, download, and OCR recent draws into JSON records.
    Harvest(HarvestArgs),
    /// Synthesize placeholder draws below the newest real record.
    Seed(SeedArgs),
}

#[derive(clap::Args, Debug)]
struct HarvestArgs {
    /// Which game to harvest.
    #[arg(long, value_enum)]
    game: GameArg,

    /// Listing pages to walk.
    #[arg(long, default_value_t = 5)]
    pages: u32,

    /// Process at most this many draws (skips the interactive prompt).
    #[arg(long)]
    limit: Option<usize>,

    /// Reprocess draws whose record already exists.
    #[arg(long)]
    force: bool,

    /// Root directory for output records.
    #[arg(long, default_value = "data/draws")]
    data_dir: PathBuf,

    /// Directory for downloaded PDFs and rendered images.
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Vision model ID.
    #[arg(long, env = "VIETLOTT_OCR_MODEL", default_value = "gpt-4o")]
    model: String,

    /// Pause after each model call, in milliseconds.
    #[arg(long, default_value_t = 1500)]
    delay_ms: u64,

    /// Process all discovered draws without asking.
    #[arg(short, long)]
    yes: bool,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,
}

#[derive(clap::Args, Debug)]
struct SeedArgs {
    /// Which game to extend.
    #[arg(long, value_enum)]
    game: GameArg,

    /// How many placeholder draws to generate.
    #[arg(long, default_value_t = 22)]
    count: usize,

    /// Root directory for output records.
    #[arg(long, default_value = "data/draws")]
    data_dir: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GameArg {
    Power,
    Mega,
}

impl From<GameArg> for GameType {
    fn from(v: GameArg) -> Self {
        match v {
            GameArg::Power => GameType::Power655,
            GameArg::Mega => GameType::Mega645,
        }
    }
}

// ── Main ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Suppress INFO-level library logs when the progress bar is active; the
    // bar provides all the feedback that matters to the user.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        match &cli.command {
            Command::Harvest(args) if !args.no_progress => "error",
            _ => "info",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Harvest(args) => run_harvest(args, cli.quiet).await,
        Command::Seed(args) => run_seed(args, cli.quiet),
    }
}

async fn run_harvest(args: HarvestArgs, quiet: bool) -> Result<()> {
    let game: GameType = args.game.into();

    if !quiet {
        eprintln!("{}", bold(&"=".repeat(60)));
        eprintln!("{}", bold(&format!("Vietlott {game} — Vision OCR harvester")));
        eprintln!("{}", bold(&"=".repeat(60)));
    }

    let limit = match args.limit {
        Some(n) => Some(n),
        None if args.yes => None,
        None => prompt_for_limit(quiet)?,
    };

    let show_progress = !quiet && !args.no_progress;
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn HarvestProgressCallback>)
    } else {
        None
    };

    let mut builder = HarvestConfig::builder(game)
        .pages(args.pages)
        .limit(limit)
        .force(args.force)
        .data_dir(args.data_dir)
        .model(args.model)
        .request_delay_ms(args.delay_ms);
    if let Some(dir) = args.scratch_dir {
        builder = builder.scratch_dir(dir);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    let report = harvest(&config).await.context("Harvest failed")?;

    if !quiet {
        eprintln!();
        eprintln!("{}", bold("=== Summary ==="));
        eprintln!("Processed: {} draws", report.attempted);
        eprintln!("Saved:     {} new draws", green(&report.saved.to_string()));
        eprintln!("Skipped:   {} existing", dim(&report.skipped.to_string()));
        if report.failed > 0 {
            eprintln!("Failed:    {} draws", red(&report.failed.to_string()));
        }
        eprintln!(
            "{}",
            dim(&format!(
                "API cost: ~${:.2} USD (vision: ~$0.01 per image)",
                report.attempted as f64 * 0.01
            ))
        );
    }

    Ok(())
}

/// Ask how many draws to process. Blank = all, `0` = exactly one (a quick
/// way to test credentials and the converter on a single draw).
fn prompt_for_limit(quiet: bool) -> Result<Option<usize>> {
    if !quiet {
        eprintln!();
        eprintln!("How many draws would you like to process?");
        eprintln!("  - Enter a number to process that many draws");
        eprintln!("  - Press Enter to process all draws");
        eprintln!("  - Enter '0' to test with just 1 draw");
        eprint!("\nNumber of draws [0=test, 1=1 draw, Enter=all]: ");
        io::stderr().flush().ok();
    }

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read draw count")?;
    let trimmed = line.trim();

    if trimmed.is_empty() {
        if !quiet {
            eprintln!("\nProcessing all draws…");
        }
        return Ok(None);
    }

    let n: usize = trimmed
        .parse()
        .with_context(|| format!("Not a number: '{trimmed}'"))?;
    if n == 0 {
        if !quiet {
            eprintln!("\nTesting with 1 draw…");
        }
        Ok(Some(1))
    } else {
        if !quiet {
            eprintln!("\nProcessing {n} draws…");
        }
        Ok(Some(n))
    }
}

fn run_seed(args: SeedArgs, quiet: bool) -> Result<()> {
    let game: GameType = args.game.into();
    let mut rng = rand::thread_rng();

    let draws = generate_samples(&args.data_dir, game, args.count, &mut rng)
        .context("Sample generation failed")?;

    if !quiet {
        for draw in &draws {
            eprintln!(
                "{} {}  {}  {:?}",
                green("✓"),
                draw.id,
                draw.draw_date.format("%d/%m/%Y"),
                draw.numbers
            );
        }
        eprintln!(
            "\n{} Generated {} sample draws for {game}",
            green("✔"),
            bold(&draws.len().to_string())
        );
    }

    Ok(())
}
