//! Extraction prompts for the hosted vision model.
//!
//! Centralising the prompts here keeps the reply format (`Date:` line,
//! `Numbers:` line) in one place next to the parser that depends on it.
//! Changing the format means touching this module and
//! [`crate::pipeline::parse`] together, nothing else.

use crate::game::GameType;

/// Build the extraction prompt for one announcement image.
///
/// The model is asked for a fixed two-line reply; everything else about the
/// wording exists to stop it from reading prize tables or the other game's
/// numbers that sometimes share the page.
pub fn extraction_prompt(game: GameType) -> String {
    match game {
        GameType::Power655 => POWER_PROMPT.to_string(),
        GameType::Mega645 => MEGA_PROMPT.to_string(),
    }
}

const POWER_PROMPT: &str = "\
This is a Vietlott Power 6/55 lottery result image. Please extract:
1. The draw date (ngày mở thưởng) - shown in DD/MM/YYYY format
2. The 6 winning numbers

The numbers are typically displayed as 6 two-digit numbers ranging from 01 to 55.
Look for numbers that are often:
- Displayed in a grid or circle pattern
- Separated by dashes, spaces, or arranged vertically
- Sometimes labeled as 'Bộ số' (winning numbers)

Return in this exact format:
Date: DD/MM/YYYY
Numbers: 01, 15, 23, 34, 42, 55";

const MEGA_PROMPT: &str = "\
This is a Vietlott Mega 6/45 lottery result image. Please extract:
1. The draw date (ngày mở thưởng) - shown in DD/MM/YYYY format
2. The 6 winning numbers

The numbers range from 01 to 45 (not 55!). Look for numbers that are often:
- Displayed in a grid or circle pattern
- Separated by dashes, spaces, or arranged vertically
- Sometimes labeled as 'Bộ số' (winning numbers)

IMPORTANT: Only extract numbers between 01-45. If you see numbers like 46-55, \
those are from Power 6/55, not Mega 6/45. Look for the 6 main numbers.

Return in this exact format:
Date: DD/MM/YYYY
Numbers: 01, 15, 23, 34, 42, 45";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_pin_the_reply_format() {
        for game in [GameType::Power655, GameType::Mega645] {
            let p = extraction_prompt(game);
            assert!(p.contains("Date: DD/MM/YYYY"));
            assert!(p.contains("Numbers: 01, 15, 23, 34, 42,"));
        }
    }

    #[test]
    fn mega_prompt_warns_about_power_range() {
        let p = extraction_prompt(GameType::Mega645);
        assert!(p.contains("01-45"));
        assert!(p.contains("not 55"));
    }
}
