//! Wire protocol for Doodle.
//!
//! This crate defines what clients and the server exchange:
//!
//! - **Identity** ([`ClientId`], [`RoomCode`], [`ConnectionId`]).
//! - **Outbound messages** ([`PlayerStatusMessage`], [`ChatMessage`],
//!   [`WordMessage`], [`DrawEvent`]), grouped under [`Outbound`] and
//!   routed to one of four per-room [`Channel`]s.
//! - **Inbound frames** ([`ClientFrame`]) sent by browsers.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]).
//!
//! The protocol layer knows nothing about rooms or rounds. It only knows
//! how messages look and where they are addressed.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use doodle_transport::ConnectionId;
pub use error::ProtocolError;
pub use types::{
    Channel, ChatMessage, ClientFrame, ClientId, DrawEvent, Outbound,
    PlayerStatus, PlayerStatusMessage, RoomCode, ServerFrame, WordMessage,
};
