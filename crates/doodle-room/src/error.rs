//! Error types for the room layer.
//!
//! These are rejection reasons. None of them is reported to the player
//! who caused it: the service logs the reason and drops the event.

use doodle_protocol::{ClientId, ConnectionId, RoomCode};

/// Why an inbound event was not applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// A required field was missing or blank.
    #[error("missing or blank field: {0}")]
    MissingField(&'static str),

    /// The connection is not in any room, or not in this one.
    #[error("connection {0} is not in a room")]
    UnknownConnection(ConnectionId),

    /// The connection is bound to a room that has since been destroyed.
    #[error("room {0} no longer exists")]
    RoomGone(RoomCode),

    /// Only the current drawer may publish strokes.
    #[error("{client_id} on {conn} is not the drawer")]
    NotDrawer {
        conn: ConnectionId,
        client_id: ClientId,
    },

    /// The configured word list has no usable words.
    #[error("vocabulary has no words")]
    EmptyVocabulary,
}
