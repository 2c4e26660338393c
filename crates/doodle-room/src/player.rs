//! The player value type.

use doodle_protocol::{ClientId, PlayerStatus, PlayerStatusMessage};

/// Snapshot of one participant.
///
/// Never mutated in place: a status change builds a new `Player` that the
/// room swaps in for the old one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    client_id: ClientId,
    name: String,
    ready: bool,
    score: u32,
}

impl Player {
    /// A freshly joined player: not ready, no points.
    pub fn new(client_id: ClientId, name: impl Into<String>) -> Self {
        Self {
            client_id,
            name: name.into(),
            ready: false,
            score: 0,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// This player with the ready flag set; the score is kept.
    pub fn with_ready(&self) -> Self {
        Self {
            ready: true,
            ..self.clone()
        }
    }

    /// This player with one more point.
    pub fn with_point(&self) -> Self {
        Self {
            score: self.score.saturating_add(1),
            ..self.clone()
        }
    }

    /// A status message about this player, optionally addressed to one
    /// client.
    pub fn status(
        &self,
        status: PlayerStatus,
        target: Option<&ClientId>,
    ) -> PlayerStatusMessage {
        PlayerStatusMessage {
            client_id: self.client_id.clone(),
            name: self.name.clone(),
            target_client_id: target.cloned(),
            status,
            score: self.score,
        }
    }
}
