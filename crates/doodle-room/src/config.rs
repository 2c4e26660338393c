//! Room configuration.

use serde::{Deserialize, Serialize};

use crate::vocabulary::DEFAULT_WORDS;

/// Settings shared by every room on a server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Words a drawer may be given. Must contain at least one non-blank
    /// entry.
    pub words: Vec<String>,

    /// Reserved client id that system chat lines and canvas clears are
    /// attributed to. Should not collide with a real client's id.
    pub system_client_id: String,

    /// Display name shown next to system chat lines.
    pub system_name: String,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
            system_client_id: "system".to_string(),
            system_name: "System".to_string(),
        }
    }
}
