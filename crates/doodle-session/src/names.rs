//! Friendly display names derived from client ids.

use doodle_protocol::ClientId;

const PREFIXES: [&str; 16] = [
    "Brisk", "Sunny", "Clever", "Swift", "Bright", "Quiet", "Bold", "Kind",
    "Lucky", "Merry", "Nimble", "Calm", "Witty", "Gentle", "Stellar", "Zesty",
];

const SUFFIXES: [&str; 16] = [
    "Fox", "Otter", "Hawk", "Panda", "Whale", "Lynx", "Robin", "Tiger",
    "Kite", "Finch", "Dolphin", "Raven", "Badger", "Koala", "Heron", "Orca",
];

/// Returns the display name for `client_id`, e.g. `"Brisk Fox"`.
///
/// Deterministic: a client keeps its name across reconnects and server
/// restarts as long as it keeps its id.
pub fn display_name(client_id: &ClientId) -> String {
    let hash = name_hash(client_id.as_str()) as usize;
    let prefix = PREFIXES[hash % PREFIXES.len()];
    let suffix = SUFFIXES[(hash / PREFIXES.len()) % SUFFIXES.len()];
    format!("{prefix} {suffix}")
}

/// 31-multiplier rolling hash over UTF-16 code units, wrapping at 32 bits.
fn name_hash(s: &str) -> u32 {
    let h = s
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    h.unsigned_abs()
}
