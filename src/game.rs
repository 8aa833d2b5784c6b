//! Domain types: lottery game variants and the draw record they produce.
//!
//! The two Vietlott games differ only in their valid number range and in the
//! textual markers used on the results site (the `[655]`/`[645]` tag embedded
//! in announcement PDF URLs). Everything game-specific is answered by
//! [`GameType`] so the pipeline stages stay generic.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which lottery variant a draw belongs to.
///
/// Determines the valid number range, the record id prefix, and the URLs
/// used during listing discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    /// Power 6/55 — six numbers from 1 to 55.
    #[serde(rename = "POWER_6_55")]
    Power655,
    /// Mega 6/45 — six numbers from 1 to 45.
    #[serde(rename = "MEGA_6_45")]
    Mega645,
}

impl GameType {
    /// Largest valid winning number for this game.
    pub fn max_number(self) -> u8 {
        match self {
            GameType::Power655 => 55,
            GameType::Mega645 => 45,
        }
    }

    /// Record id prefix (`power` / `mega`).
    pub fn id_prefix(self) -> &'static str {
        match self {
            GameType::Power655 => "power",
            GameType::Mega645 => "mega",
        }
    }

    /// Output directory name under the data root.
    pub fn dir_name(self) -> &'static str {
        match self {
            GameType::Power655 => "power_6_55",
            GameType::Mega645 => "mega_6_45",
        }
    }

    /// Three-digit tag embedded in announcement PDF URLs (`[655]` / `[645]`).
    pub fn bracket_tag(self) -> &'static str {
        match self {
            GameType::Power655 => "655",
            GameType::Mega645 => "645",
        }
    }

    /// Results-listing page URL for the given 1-indexed page.
    pub fn listing_url(self, page: u32) -> String {
        format!(
            "https://vietlott.vn/vi/trung-thuong/ket-qua-trung-thuong/thong-bao-ket-qua-{}?pageindex={}&nocatche=1",
            self.bracket_tag(),
            page
        )
    }

    /// Record id for a draw number: `power_01295`, `mega_00042`, …
    pub fn draw_id(self, draw_number: u32) -> String {
        format!("{}_{:05}", self.id_prefix(), draw_number)
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Power655 => write!(f, "Power 6/55"),
            GameType::Mega645 => write!(f, "Mega 6/45"),
        }
    }
}

/// One harvested lottery draw, as persisted to JSON.
///
/// `jackpot`/`winners` are only populated by the sample generator (the
/// announcement PDFs carry prize data we do not extract); they are omitted
/// from the JSON when absent so harvested records keep the minimal schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub id: String,
    pub game_type: GameType,
    pub draw_number: u32,
    pub numbers: Vec<u8>,
    pub draw_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jackpot: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winners: Option<u64>,
}

impl Draw {
    /// Build a record from extraction results. Numbers are expected to be
    /// sorted and validated by the caller.
    pub fn new(game: GameType, draw_number: u32, numbers: Vec<u8>, draw_date: DateTime<Utc>) -> Self {
        Self {
            id: game.draw_id(draw_number),
            game_type: game,
            draw_number,
            numbers,
            draw_date,
            jackpot: None,
            winners: None,
        }
    }
}

/// A draw date at the fixed 18:00:00 UTC draw time.
///
/// Returns `None` for day/month combinations that do not exist on the
/// calendar (e.g. 31/02) — the reply parser treats those as "no date".
pub fn draw_datetime(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 18, 0, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_id_is_zero_padded() {
        assert_eq!(GameType::Power655.draw_id(42), "power_00042");
        assert_eq!(GameType::Mega645.draw_id(1295), "mega_01295");
    }

    #[test]
    fn listing_url_embeds_game_tag_and_page() {
        let url = GameType::Mega645.listing_url(3);
        assert!(url.contains("thong-bao-ket-qua-645"));
        assert!(url.contains("pageindex=3"));
    }

    #[test]
    fn draw_serialises_with_utc_suffix_and_enum_name() {
        let date = draw_datetime(2024, 3, 5).unwrap();
        let draw = Draw::new(GameType::Power655, 1288, vec![1, 15, 23, 34, 42, 55], date);
        let json = serde_json::to_string_pretty(&draw).unwrap();

        assert!(json.contains("\"id\": \"power_01288\""));
        assert!(json.contains("\"game_type\": \"POWER_6_55\""));
        assert!(json.contains("\"draw_date\": \"2024-03-05T18:00:00Z\""));
        // Optional prize fields stay out of harvested records.
        assert!(!json.contains("jackpot"));
        assert!(!json.contains("winners"));
    }

    #[test]
    fn draw_roundtrips_through_json() {
        let date = draw_datetime(2025, 1, 2).unwrap();
        let mut draw = Draw::new(GameType::Mega645, 7, vec![3, 9, 12, 21, 30, 44], date);
        draw.jackpot = Some(0);
        draw.winners = Some(0);

        let json = serde_json::to_string(&draw).unwrap();
        let back: Draw = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draw);
    }

    #[test]
    fn invalid_calendar_date_is_rejected() {
        assert!(draw_datetime(2024, 2, 30).is_none());
        assert!(draw_datetime(2024, 13, 1).is_none());
        assert!(draw_datetime(2024, 2, 29).is_some()); // leap year
    }
}
