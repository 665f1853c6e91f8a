//! Word-collection progress record
//!
//! Stored as base64 of the UTF-8 JSON document so words with non-ASCII
//! characters survive the round trip.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Storage;

/// LocalStorage key for progress
pub const PROGRESS_KEY: &str = "flappy_progress_v2";

/// Persisted slice of the collectibles state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProgress {
    pub word_index: usize,
    pub char_index: usize,
    pub collected_words: Vec<String>,
    pub key_fragments: usize,
}

/// Why a stored blob could not be read back
#[derive(Debug, Error)]
pub enum ProgressDecodeError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("invalid progress json: {0}")]
    Json(#[from] serde_json::Error),
}

impl SavedProgress {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(STANDARD.encode(json.as_bytes()))
    }

    pub fn decode(raw: &str) -> Result<Self, ProgressDecodeError> {
        let bytes = STANDARD.decode(raw.trim())?;
        let json = String::from_utf8(bytes)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Load progress; any failure yields empty progress
pub fn load_progress(storage: &dyn Storage) -> SavedProgress {
    let raw = match storage.get(PROGRESS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return SavedProgress::default(),
        Err(e) => {
            log::warn!("Progress load skipped: {}", e);
            return SavedProgress::default();
        }
    };

    match SavedProgress::decode(&raw) {
        Ok(progress) => {
            log::info!(
                "Loaded progress: {} fragments, word {}",
                progress.key_fragments,
                progress.word_index
            );
            progress
        }
        Err(e) => {
            log::warn!("Discarding corrupt progress: {}", e);
            SavedProgress::default()
        }
    }
}

/// Save progress; failures are logged and dropped
pub fn save_progress(storage: &mut dyn Storage, progress: &SavedProgress) {
    let encoded = match progress.encode() {
        Ok(encoded) => encoded,
        Err(e) => {
            log::warn!("Progress save skipped: {}", e);
            return;
        }
    };
    if let Err(e) = storage.set(PROGRESS_KEY, &encoded) {
        log::warn!("Progress save skipped: {}", e);
    }
}

/// Remove saved progress; failures are logged and dropped
pub fn clear_progress(storage: &mut dyn Storage) {
    if let Err(e) = storage.remove(PROGRESS_KEY) {
        log::warn!("Progress clear skipped: {}", e);
    }
}
