//! Best score record
//!
//! A single integer persisted as a decimal string.

use crate::persistence::Storage;

/// LocalStorage key for the best score
pub const HIGH_SCORE_KEY: &str = "cyberflap_highscore";

/// Load the best score; missing or unreadable values count as zero
pub fn load_high_score(storage: &dyn Storage) -> u32 {
    match storage.get(HIGH_SCORE_KEY) {
        Ok(Some(raw)) => parse_score(&raw),
        Ok(None) => 0,
        Err(e) => {
            log::warn!("High score load skipped: {}", e);
            0
        }
    }
}

/// Save the best score; failures are logged and dropped
pub fn save_high_score(storage: &mut dyn Storage, score: u32) {
    match storage.set(HIGH_SCORE_KEY, &score.to_string()) {
        Ok(()) => log::debug!("High score saved ({})", score),
        Err(e) => log::warn!("High score save skipped: {}", e),
    }
}

/// Leading-digits parse; anything else is zero
fn parse_score(raw: &str) -> u32 {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
