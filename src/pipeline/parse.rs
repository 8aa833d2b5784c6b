//! Reply parsing: the model's free-text answer → numbers and date.
//!
//! The prompt pins the reply to two lines (`Date: DD/MM/YYYY` and
//! `Numbers: 01, 15, …`), but models drift — extra narration, dashes
//! instead of commas, missing leading zeros. The policy here is therefore
//! deliberately token-based rather than line-based:
//!
//! * **date** — first `Date: DD/MM/YYYY` match anywhere in the reply;
//!   absent (or an impossible calendar date) leaves the date unset so the
//!   caller can substitute the listing-page date.
//! * **numbers** — dashes and commas become spaces, the reply is split on
//!   whitespace, and the first embedded integer of each token is kept when
//!   it falls in the game's range and has not been seen yet; collection
//!   stops at six and the result is sorted ascending.
//!
//! Out-of-range values never enter the result, and a short reply is
//! returned short — the caller treats anything other than exactly six
//! numbers as a failed draw. Nothing is padded or guessed.

use crate::game::{draw_datetime, GameType};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// What the model reply yielded for one draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Up to six unique in-range numbers, sorted ascending.
    pub numbers: Vec<u8>,
    /// Draw date at 18:00:00 UTC, when the reply carried one.
    pub date: Option<DateTime<Utc>>,
}

static RE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Date:\s*(\d{2})/(\d{2})/(\d{4})").unwrap());

static RE_FIRST_INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Parse a full model reply for the given game.
pub fn parse_reply(text: &str, game: GameType) -> Extraction {
    Extraction {
        numbers: parse_numbers(text, game.max_number()),
        date: parse_date(text),
    }
}

/// First `Date: DD/MM/YYYY` occurrence, as a datetime at 18:00:00 UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let caps = RE_DATE.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    draw_datetime(year, month, day)
}

/// Collect up to six unique integers in `1..=max` from the reply.
pub fn parse_numbers(text: &str, max: u8) -> Vec<u8> {
    let text = text.replace(['-', ','], " ");

    let mut numbers: Vec<u8> = Vec::with_capacity(6);
    for token in text.split_whitespace() {
        let Some(m) = RE_FIRST_INT.find(token) else {
            continue;
        };
        // Tokens like "99999999999" overflow u32; they can't be in range
        // anyway, so a failed parse is just skipped.
        let Ok(value) = m.as_str().parse::<u32>() else {
            continue;
        };
        if value >= 1 && value <= u32::from(max) {
            let value = value as u8;
            if !numbers.contains(&value) {
                numbers.push(value);
                if numbers.len() == 6 {
                    break;
                }
            }
        }
    }

    numbers.sort_unstable();
    numbers
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn numbers_line_parses_sorted_unique() {
        let numbers = parse_numbers("Numbers: 01, 15, 23, 34, 42, 55", 55);
        assert_eq!(numbers, vec![1, 15, 23, 34, 42, 55]);
    }

    #[test]
    fn dash_separated_numbers_parse() {
        let numbers = parse_numbers("Numbers: 03-07-19-25-31-44", 45);
        assert_eq!(numbers, vec![3, 7, 19, 25, 31, 44]);
    }

    #[test]
    fn out_of_range_values_are_excluded() {
        // 46–55 belong to Power, not Mega.
        let numbers = parse_numbers("Numbers: 02, 46, 11, 55, 20, 33, 40, 44", 45);
        assert_eq!(numbers, vec![2, 11, 20, 33, 40, 44]);
    }

    #[test]
    fn duplicates_are_kept_once() {
        let numbers = parse_numbers("05 05 12 12 19 26 33 40", 55);
        assert_eq!(numbers, vec![5, 12, 19, 26, 33, 40]);
    }

    #[test]
    fn short_reply_is_returned_short_never_padded() {
        let numbers = parse_numbers("Numbers: 08, 17, 29", 45);
        assert_eq!(numbers, vec![8, 17, 29]);
    }

    #[test]
    fn collection_stops_at_six() {
        let numbers = parse_numbers("1 2 3 4 5 6 7 8 9", 55);
        assert_eq!(numbers.len(), 6);
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn tokens_with_embedded_digits_contribute_first_integer() {
        let numbers = parse_numbers("no12x 34abc", 55);
        assert_eq!(numbers, vec![12, 34]);
    }

    #[test]
    fn zero_and_huge_tokens_are_skipped() {
        let numbers = parse_numbers("00 0 99999999999999999999 7", 55);
        assert_eq!(numbers, vec![7]);
    }

    #[test]
    fn date_line_parses_to_1800_utc() {
        let date = parse_date("Date: 05/03/2024").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 5));
        assert_eq!((date.hour(), date.minute(), date.second()), (18, 0, 0));
    }

    #[test]
    fn missing_or_malformed_date_is_unset() {
        assert!(parse_date("Numbers: 01, 02, 03, 04, 05, 06").is_none());
        assert!(parse_date("Date: 5/3/2024").is_none()); // needs two digits
        assert!(parse_date("Date: 31/02/2024").is_none()); // impossible date
    }

    #[test]
    fn full_reply_yields_six_numbers_and_date() {
        let reply = "Date: 12/11/2023\nNumbers: 09, 14, 22, 30, 41, 52";
        let extraction = parse_reply(reply, GameType::Power655);
        assert_eq!(extraction.numbers.len(), 6);
        assert!(extraction.date.is_some());
        assert!(extraction.numbers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn date_digits_participate_in_token_scan() {
        // The policy scans the whole reply; the DD token of the date line is
        // an in-range integer and counts toward the six. This mirrors the
        // fixed reply format, where six explicit numbers always follow and
        // duplicates collapse.
        let reply = "Date: 05/03/2024\nNumbers: 05, 14, 22, 30, 41, 52";
        let extraction = parse_reply(reply, GameType::Power655);
        assert_eq!(extraction.numbers, vec![5, 14, 22, 30, 41, 52]);
    }

    #[test]
    fn narration_around_the_answer_is_tolerated() {
        let reply = "Sure! Here is what I can read:\n\
                     Date: 28/09/2024\n\
                     Numbers: 04, 13, 27, 35, 39, 45\n\
                     Let me know if you need anything else.";
        let extraction = parse_reply(reply, GameType::Mega645);
        // "28" from the date line is in range and scans first.
        assert_eq!(extraction.numbers, vec![4, 13, 27, 28, 35, 39]);
        assert!(extraction.date.is_some());
    }
}
