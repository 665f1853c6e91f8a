//! Reward link shown when every word is collected
//!
//! The link is stored XOR-scrambled and base64-encoded so it does not show up
//! in a plain string search of the bundle. This is not a security boundary.

use std::sync::OnceLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const SCRAMBLE_KEY: &[u8] = b"cyberflap";
const SCRAMBLED_LINK: &str = "Cw0WFQFcQ04JDAwWEFwECU4UMg5WEksxCzkTMg==";

/// XOR every byte with the repeating key (self-inverse)
pub fn scramble(data: &[u8], key: &[u8]) -> Vec<u8> {
    if key.is_empty() {
        return data.to_vec();
    }
    data.iter()
        .zip(key.iter().cycle())
        .map(|(b, k)| b ^ k)
        .collect()
}

/// Reverse of the stored transform; empty on malformed input
pub fn unscramble_link(encoded: &str, key: &[u8]) -> String {
    STANDARD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(scramble(&bytes, key)).ok())
        .unwrap_or_default()
}

/// The reward payload, derived once per process
pub fn reward_link() -> &'static str {
    static LINK: OnceLock<String> = OnceLock::new();
    LINK.get_or_init(|| unscramble_link(SCRAMBLED_LINK, SCRAMBLE_KEY))
}
