//! # Doodle
//!
//! Real-time server for a drawing-and-guessing party game.
//!
//! Players join a room by code, ready up, and take turns drawing a secret
//! word while everyone else guesses. The server is authoritative: it
//! decides who draws, which word they get, who scored, and which strokes
//! are relayed.
//!
//! ## Layers
//!
//! ```text
//! DoodleServer / handler   ← WebSocket connections, client frames
//!     ↕
//! TopicHub (Broadcaster)   ← destination subscriptions, fan-out
//!     ↕
//! GameService              ← sessions + rooms, one lock per room
//!     ↕
//! doodle-room              ← Room, RoundEngine, catch-up replay
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doodle::prelude::*;
//!
//! # async fn start() -> Result<(), DoodleError> {
//! let server = DoodleServer::builder()
//!     .bind("127.0.0.1:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```
//!
//! [`GameService`] can also be driven directly with any [`Broadcaster`],
//! which is how the game rules are tested without sockets.

mod broadcaster;
mod error;
mod handler;
mod hub;
mod server;
mod service;

pub use broadcaster::Broadcaster;
pub use error::DoodleError;
pub use hub::TopicHub;
pub use server::{DEFAULT_ADDR, DoodleServer, DoodleServerBuilder};
pub use service::GameService;

/// Everything needed to run a server or drive a [`GameService`].
pub mod prelude {
    pub use crate::{
        Broadcaster, DEFAULT_ADDR, DoodleError, DoodleServer,
        DoodleServerBuilder, GameService, TopicHub,
    };
    pub use doodle_protocol::{
        Channel, ChatMessage, ClientFrame, ClientId, Codec, ConnectionId,
        DrawEvent, JsonCodec, Outbound, PlayerStatus, PlayerStatusMessage,
        RoomCode, ServerFrame, WordMessage,
    };
    pub use doodle_room::{
        Player, Room, RoomConfig, RoomError, lock_unpoisoned,
    };
}
