//! Rooms and rounds for Doodle.
//!
//! A room is one game instance behind a shared code. It owns its players
//! in join order, the current drawer, and the current secret word. Every
//! mutation of a room happens through [`RoundEngine`] while the caller
//! holds that room's lock, so each inbound event is applied atomically.
//!
//! # Key types
//!
//! - [`Player`]: immutable snapshot of one participant
//! - [`Room`]: players, drawer and word of one game instance
//! - [`RoundEngine`]: join, ready, guess, draw and leave, producing the
//!   messages to publish
//! - [`catch_up`]: the targeted replay a newcomer needs
//! - [`RoomRegistry`]: rooms by code, one mutex per room
//! - [`RoomConfig`] / [`Vocabulary`]: word list and system identity

mod config;
mod engine;
mod error;
mod player;
mod registry;
mod replay;
mod room;
mod vocabulary;

pub use config::RoomConfig;
pub use engine::RoundEngine;
pub use error::RoomError;
pub use player::Player;
pub use registry::{RoomRegistry, SharedRoom, lock_unpoisoned};
pub use replay::catch_up;
pub use room::Room;
pub use vocabulary::{DEFAULT_WORDS, Vocabulary};
