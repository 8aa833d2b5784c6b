//! Record persistence: one JSON file per draw, per-game directory.
//!
//! The store is the pipeline's only durable state. Existence of a record
//! file is the sole source of truth for "already processed" — there is no
//! index to fall out of sync with. `open` scans the directory once; the
//! in-memory id set only ever grows during a run.
//!
//! Writes are plain `fs::write` with no locking: a run is single-process
//! and sequential, and a record is small enough that a torn write has never
//! been observed in practice. Re-running after an interruption simply
//! overwrites the one possibly-torn file.

use crate::error::{DrawError, HarvestError};
use crate::game::{Draw, GameType};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The per-game record directory plus the set of ids found in it.
pub struct DrawStore {
    game: GameType,
    dir: PathBuf,
    existing: HashSet<String>,
}

impl DrawStore {
    /// Create the directory if needed and scan it for existing records.
    ///
    /// Only files named `<prefix>_*.json` for this store's game count;
    /// anything else in the directory is ignored.
    pub fn open(data_dir: &Path, game: GameType) -> Result<Self, HarvestError> {
        let dir = data_dir.join(game.dir_name());
        fs::create_dir_all(&dir).map_err(|e| HarvestError::StoreIo {
            path: dir.clone(),
            source: e,
        })?;

        let mut existing = HashSet::new();
        let entries = fs::read_dir(&dir).map_err(|e| HarvestError::StoreIo {
            path: dir.clone(),
            source: e,
        })?;
        let prefix = format!("{}_", game.id_prefix());
        for entry in entries {
            let entry = entry.map_err(|e| HarvestError::StoreIo {
                path: dir.clone(),
                source: e,
            })?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(stem) = name.strip_suffix(".json") {
                if stem.starts_with(&prefix) {
                    existing.insert(stem.to_string());
                }
            }
        }

        info!("Found {} existing draws in {}", existing.len(), dir.display());
        Ok(Self { game, dir, existing })
    }

    /// Whether a record for this id already exists.
    pub fn contains(&self, id: &str) -> bool {
        self.existing.contains(id)
    }

    /// Number of records present when the store was opened plus those saved
    /// since.
    pub fn len(&self) -> usize {
        self.existing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.existing.is_empty()
    }

    /// Directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a record, overwriting any existing file with the same id.
    ///
    /// The skip-unless-forced policy lives in the orchestrator; the store
    /// itself always writes what it is given.
    pub fn save(&mut self, draw: &Draw) -> Result<PathBuf, DrawError> {
        let path = self.dir.join(format!("{}.json", draw.id));

        let json = serde_json::to_string_pretty(draw).map_err(|e| DrawError::Persist {
            draw_number: draw.draw_number,
            path: path.clone(),
            source: std::io::Error::other(e),
        })?;

        fs::write(&path, json).map_err(|e| DrawError::Persist {
            draw_number: draw.draw_number,
            path: path.clone(),
            source: e,
        })?;

        self.existing.insert(draw.id.clone());
        debug!("Saved {}", path.display());
        Ok(path)
    }

    /// Load the record with the highest draw number, if any.
    ///
    /// The sample generator extends backwards from this record.
    pub fn latest(&self) -> Result<Option<Draw>, HarvestError> {
        let Some(id) = self
            .existing
            .iter()
            .max_by_key(|id| draw_number_of(id))
        else {
            return Ok(None);
        };

        let path = self.dir.join(format!("{id}.json"));
        let raw = fs::read_to_string(&path).map_err(|e| HarvestError::StoreIo {
            path: path.clone(),
            source: e,
        })?;
        let draw: Draw = serde_json::from_str(&raw).map_err(|e| HarvestError::CorruptRecord {
            path,
            detail: e.to_string(),
        })?;
        Ok(Some(draw))
    }

    /// Game this store belongs to.
    pub fn game(&self) -> GameType {
        self.game
    }
}

/// Draw number embedded in a record id (`power_01288` → 1288).
fn draw_number_of(id: &str) -> u32 {
    id.rsplit('_')
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::draw_datetime;

    fn sample_draw(game: GameType, n: u32) -> Draw {
        Draw::new(
            game,
            n,
            vec![1, 15, 23, 34, 42, 45],
            draw_datetime(2024, 3, 5).unwrap(),
        )
    }

    #[test]
    fn open_scans_only_matching_records() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("mega_6_45");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("mega_00001.json"), "{}").unwrap();
        fs::write(dir.join("mega_00002.json"), "{}").unwrap();
        fs::write(dir.join("power_00003.json"), "{}").unwrap();
        fs::write(dir.join("notes.txt"), "x").unwrap();

        let store = DrawStore::open(root.path(), GameType::Mega645).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.contains("mega_00001"));
        assert!(!store.contains("power_00003"));
    }

    #[test]
    fn save_then_contains_then_reload() {
        let root = tempfile::tempdir().unwrap();
        let mut store = DrawStore::open(root.path(), GameType::Power655).unwrap();
        assert!(store.is_empty());

        let draw = sample_draw(GameType::Power655, 1288);
        let path = store.save(&draw).unwrap();
        assert!(path.ends_with("power_01288.json"));
        assert!(store.contains("power_01288"));

        // A fresh scan sees the record too.
        let reopened = DrawStore::open(root.path(), GameType::Power655).unwrap();
        assert!(reopened.contains("power_01288"));
    }

    #[test]
    fn save_overwrites_in_place() {
        let root = tempfile::tempdir().unwrap();
        let mut store = DrawStore::open(root.path(), GameType::Mega645).unwrap();

        let mut draw = sample_draw(GameType::Mega645, 7);
        store.save(&draw).unwrap();

        draw.numbers = vec![2, 3, 5, 7, 11, 13];
        store.save(&draw).unwrap();

        let reloaded = store.latest().unwrap().unwrap();
        assert_eq!(reloaded.numbers, vec![2, 3, 5, 7, 11, 13]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn latest_picks_highest_draw_number() {
        let root = tempfile::tempdir().unwrap();
        let mut store = DrawStore::open(root.path(), GameType::Power655).unwrap();
        store.save(&sample_draw(GameType::Power655, 9)).unwrap();
        store.save(&sample_draw(GameType::Power655, 1288)).unwrap();
        store.save(&sample_draw(GameType::Power655, 400)).unwrap();

        let latest = store.latest().unwrap().unwrap();
        assert_eq!(latest.draw_number, 1288);
    }

    #[test]
    fn latest_on_empty_store_is_none() {
        let root = tempfile::tempdir().unwrap();
        let store = DrawStore::open(root.path(), GameType::Power655).unwrap();
        assert!(store.latest().unwrap().is_none());
    }

    #[test]
    fn corrupt_record_surfaces_as_error() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("power_6_55");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("power_00001.json"), "not json").unwrap();

        let store = DrawStore::open(root.path(), GameType::Power655).unwrap();
        let err = store.latest().unwrap_err();
        assert!(matches!(err, HarvestError::CorruptRecord { .. }));
    }
}
