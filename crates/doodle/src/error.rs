//! Unified error type for the Doodle server.

use doodle_protocol::ProtocolError;
use doodle_room::RoomError;
use doodle_transport::TransportError;

/// Top-level error that wraps every layer's error.
///
/// Only setup and connection-level failures surface as `DoodleError`.
/// Rejected game events are logged and dropped inside
/// [`GameService`](crate::GameService) and never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum DoodleError {
    /// Binding, accepting, reading or writing a connection failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The room configuration is unusable.
    #[error(transparent)]
    Room(#[from] RoomError),
}
