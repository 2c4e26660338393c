//! Connection sessions for Doodle.
//!
//! A session is the server's record of one live connection: which room it
//! joined. This crate holds:
//!
//! 1. **Session tracking**: [`SessionIndex`], connection id → room code
//! 2. **Naming**: [`display_name`], the friendly name shown for a client
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← rooms own players; the index says where to look
//!     ↕
//! Session Layer (this crate)  ← connection → room routing
//!     ↕
//! Protocol Layer (below)  ← ConnectionId, ClientId, RoomCode
//! ```

mod index;
mod names;

pub use index::SessionIndex;
pub use names::display_name;
