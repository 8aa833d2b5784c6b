//! Listing discovery: paginated results HTML → announcement triples.
//!
//! The results site renders announcement links as plain `media.vietlott.vn`
//! URLs with the game tag and draw number embedded
//! (`…/[655]---01295---….pdf`), and usually a `Ngày DD/MM/YYYY` date within
//! a couple hundred characters of the link. Matching the raw page text with
//! regexes is sufficient and survives the site's markup churn better than a
//! DOM walk would — the URL format is the stable contract, not the HTML.

use crate::error::HarvestError;
use crate::game::{draw_datetime, GameType};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

/// One announcement discovered on a listing page.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub draw_number: u32,
    pub document_url: String,
    /// Date found near the link on the listing page, if any. Used as a
    /// fallback when the model reply carries no date.
    pub known_date: Option<DateTime<Utc>>,
}

/// How far around a link occurrence to look for a `Ngày …` date.
const DATE_WINDOW: usize = 200;

static RE_POWER_PDF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https://media\.vietlott\.vn/\S*\[655\]\S*\.pdf").unwrap());
static RE_MEGA_PDF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https://media\.vietlott\.vn/\S*\[645\]\S*\.pdf").unwrap());

static RE_POWER_DRAW_NO: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[655\]---(\d+)---").unwrap());
static RE_MEGA_DRAW_NO: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[645\]---(\d+)---").unwrap());

static RE_NEARBY_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Ngày\s+(\d{2})/(\d{2})/(\d{4})").unwrap());

fn document_pattern(game: GameType) -> &'static Regex {
    match game {
        GameType::Power655 => &RE_POWER_PDF,
        GameType::Mega645 => &RE_MEGA_PDF,
    }
}

fn draw_number_pattern(game: GameType) -> &'static Regex {
    match game {
        GameType::Power655 => &RE_POWER_DRAW_NO,
        GameType::Mega645 => &RE_MEGA_DRAW_NO,
    }
}

/// Walk the paginated listing and collect every announcement found.
///
/// A non-200 page (or a network error) is logged and contributes zero
/// links; the walk continues with the next page. Duplicate draw numbers
/// across pages are kept once, first occurrence wins.
pub async fn fetch_announcements(
    http: &reqwest::Client,
    game: GameType,
    pages: u32,
    page_delay_ms: u64,
) -> Result<Vec<Announcement>, HarvestError> {
    let mut all: Vec<Announcement> = Vec::new();

    for page in 1..=pages {
        info!("Fetching listing page {page}/{pages}");
        let url = game.listing_url(page);

        let body = match http.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to read listing page {page}: {e}");
                    continue;
                }
            },
            Ok(resp) => {
                warn!("Listing page {page} returned status {}", resp.status());
                continue;
            }
            Err(e) => {
                warn!("Failed to fetch listing page {page}: {e}");
                continue;
            }
        };

        let found = extract_announcements(&body, game);
        info!("Found {} announcements on page {page}", found.len());

        for ann in found {
            if !all.iter().any(|a| a.draw_number == ann.draw_number) {
                all.push(ann);
            }
        }

        if page < pages {
            sleep(Duration::from_millis(page_delay_ms)).await;
        }
    }

    info!("Total announcements discovered: {}", all.len());
    Ok(all)
}

/// Extract announcement triples from one page of raw HTML.
///
/// Pure function over the page text; no ordering guarantee beyond document
/// order of the matches.
pub fn extract_announcements(html: &str, game: GameType) -> Vec<Announcement> {
    let mut result = Vec::new();

    for m in document_pattern(game).find_iter(html) {
        let url = m.as_str();

        let Some(caps) = draw_number_pattern(game).captures(url) else {
            continue;
        };
        let Ok(draw_number) = caps[1].parse::<u32>() else {
            continue;
        };

        result.push(Announcement {
            draw_number,
            document_url: url.to_string(),
            known_date: nearby_date(html, m.start(), m.end()),
        });
    }

    result
}

/// Look for a `Ngày DD/MM/YYYY` date within [`DATE_WINDOW`] characters of a
/// link occurrence. The window is clamped to char boundaries — the page is
/// Vietnamese text and a byte-offset slice could split a code point.
fn nearby_date(html: &str, start: usize, end: usize) -> Option<DateTime<Utc>> {
    let mut lo = start.saturating_sub(DATE_WINDOW);
    while lo > 0 && !html.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (end + DATE_WINDOW).min(html.len());
    while hi < html.len() && !html.is_char_boundary(hi) {
        hi += 1;
    }

    let caps = RE_NEARBY_DATE.captures(&html[lo..hi])?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    draw_datetime(year, month, day)
}
