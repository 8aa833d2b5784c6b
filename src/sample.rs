//! Placeholder-draw synthesis: pad a harvested dataset with sample records.
//!
//! Backtesting wants more history than the announcement pages expose. This
//! module extends the dataset *backwards* from the newest real record:
//! draw numbers count down one per record, dates step back three days per
//! draw (the games run roughly three times a week), and the numbers are
//! uniform random picks. Generated records carry `jackpot`/`winners` of 0
//! so they are distinguishable from harvested ones, which omit the fields.

use crate::error::HarvestError;
use crate::game::{Draw, GameType};
use crate::store::DrawStore;
use chrono::Duration;
use rand::seq::index::sample as index_sample;
use rand::Rng;
use std::path::Path;
use tracing::info;

/// Days between consecutive synthetic draws.
const DRAW_SPACING_DAYS: i64 = 3;

/// Generate `count` placeholder records below the newest existing draw.
///
/// Existing records are never touched: generation starts at
/// `newest.draw_number - 1` and walks down. Stops early if the countdown
/// would reach draw number zero.
///
/// # Errors
/// [`HarvestError::NoBaseDraw`] when the store holds no record to extend.
pub fn generate_samples(
    data_dir: &Path,
    game: GameType,
    count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Draw>, HarvestError> {
    let mut store = DrawStore::open(data_dir, game)?;
    let base = store.latest()?.ok_or_else(|| HarvestError::NoBaseDraw {
        dir: store.dir().to_path_buf(),
    })?;

    info!(
        "Extending {} backwards from draw {} ({})",
        game, base.draw_number, base.draw_date
    );

    let mut generated = Vec::with_capacity(count);
    for i in 0..count {
        let offset = i as u32 + 1;
        if base.draw_number <= offset {
            break;
        }
        let draw_number = base.draw_number - offset;
        let draw_date = base.draw_date - Duration::days(DRAW_SPACING_DAYS * i64::from(offset));

        let mut draw = Draw::new(game, draw_number, random_numbers(game, rng), draw_date);
        draw.jackpot = Some(0);
        draw.winners = Some(0);

        store.save(&draw).map_err(|e| HarvestError::Internal(e.to_string()))?;
        generated.push(draw);
    }

    info!("Generated {} sample draws", generated.len());
    Ok(generated)
}

/// Six unique uniform picks from the game's range, ascending.
fn random_numbers(game: GameType, rng: &mut impl Rng) -> Vec<u8> {
    let mut numbers: Vec<u8> = index_sample(rng, usize::from(game.max_number()), 6)
        .into_iter()
        .map(|i| i as u8 + 1)
        .collect();
    numbers.sort_unstable();
    numbers
}
