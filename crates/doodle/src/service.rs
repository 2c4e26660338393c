//! `GameService`: the entry point for every inbound game event.
//!
//! The service owns the session index and the room registry. For each
//! event it resolves the connection's room, locks that room, runs the
//! [`RoundEngine`] operation, and hands the resulting messages to the
//! [`Broadcaster`] before the lock is released. Events for one room are
//! therefore applied and published one at a time, in a single order that
//! every subscriber sees. Events for different rooms never wait on each
//! other.
//!
//! # Lock order
//!
//! room, then sessions. The registry lock is only held inside
//! [`RoomRegistry`] calls and never while waiting on a room. The sessions
//! lock is only ever held for one lookup or update and never while a room
//! lock is being taken.
//!
//! # Rejections
//!
//! Invalid or stale events (blank fields, unbound connections, strokes
//! from someone other than the drawer) change nothing and publish nothing.
//! The reason is logged at debug level and the event is dropped.

use std::sync::{Mutex, MutexGuard};

use doodle_protocol::{ClientId, ConnectionId, DrawEvent, Outbound, RoomCode};
use doodle_room::{
    Room, RoomConfig, RoomError, RoomRegistry, RoundEngine, lock_unpoisoned,
};
use doodle_session::{SessionIndex, display_name};

use crate::Broadcaster;

/// Orchestrates sessions, rooms and rounds for one server instance.
pub struct GameService<B: Broadcaster> {
    sessions: Mutex<SessionIndex>,
    rooms: RoomRegistry,
    engine: RoundEngine,
    broadcaster: B,
}

impl<B: Broadcaster> GameService<B> {
    /// Creates a service with no rooms and no sessions.
    ///
    /// # Errors
    /// Returns [`RoomError::EmptyVocabulary`] if `config` has no usable
    /// word.
    pub fn new(config: &RoomConfig, broadcaster: B) -> Result<Self, RoomError> {
        Ok(Self {
            sessions: Mutex::new(SessionIndex::new()),
            rooms: RoomRegistry::new(),
            engine: RoundEngine::new(config)?,
            broadcaster,
        })
    }

    // ---------------------------------------------------------------
    // Inbound events
    // ---------------------------------------------------------------

    /// Puts `conn` in the room `code` as `client_id`, creating the room if
    /// needed.
    ///
    /// Both values are trimmed; a missing or blank one drops the event. A
    /// connection that is already in a room leaves it first.
    pub fn join(
        &self,
        conn: ConnectionId,
        code: Option<&str>,
        client_id: Option<&str>,
    ) {
        let result = self.try_join(conn, code, client_id);
        self.settle("join", conn, result);
    }

    /// Marks `conn`'s player ready, starting a round if everyone is.
    pub fn ready(&self, conn: ConnectionId) {
        let result =
            self.with_room(conn, |room| self.engine.ready(room, conn));
        self.settle("ready", conn, result);
    }

    /// Checks `text` against the current word, or relays it as chat.
    pub fn guess(&self, conn: ConnectionId, text: Option<&str>) {
        let result = text
            .ok_or(RoomError::MissingField("text"))
            .and_then(|text| {
                self.with_room(conn, |room| self.engine.guess(room, conn, text))
            });
        self.settle("guess", conn, result);
    }

    /// Relays a stroke from the current drawer.
    pub fn draw(&self, conn: ConnectionId, event: DrawEvent) {
        let result =
            self.with_room(conn, |room| self.engine.draw(room, conn, event));
        self.settle("draw", conn, result);
    }

    /// Cleans up after a connection that went away.
    ///
    /// Safe to call more than once: only the first call for a bound
    /// connection does anything.
    pub fn disconnect(&self, conn: ConnectionId) {
        let bound = self.sessions().unbind(conn);
        let result = match bound {
            Some(code) => self.leave(conn, &code),
            None => Err(RoomError::UnknownConnection(conn)),
        };
        self.settle("disconnect", conn, result);
    }

    // ---------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------

    /// The room registry. Lock a room with [`lock_unpoisoned`] to look
    /// inside it.
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Number of connections currently in a room.
    pub fn session_count(&self) -> usize {
        self.sessions().len()
    }

    /// The room `conn` is in, if any.
    pub fn room_of(&self, conn: ConnectionId) -> Option<RoomCode> {
        self.sessions().resolve(conn).cloned()
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn try_join(
        &self,
        conn: ConnectionId,
        code: Option<&str>,
        client_id: Option<&str>,
    ) -> Result<(), RoomError> {
        let code = RoomCode::new(non_blank(code, "code")?);
        let client_id = ClientId::new(non_blank(client_id, "clientId")?);

        let previous = self.sessions().unbind(conn);
        if let Some(previous) = previous {
            if let Err(e) = self.leave(conn, &previous) {
                tracing::debug!(%conn, error = %e, "stale binding on re-join");
            }
        }

        let name = display_name(&client_id);
        loop {
            let shared = self.rooms.open(&code);
            let mut room = lock_unpoisoned(&shared);
            if room.is_closed() {
                // Emptied between open() and lock(); the next open()
                // replaces it.
                continue;
            }
            let out =
                self.engine.join(&mut room, conn, client_id, name);
            self.publish(&code, out);
            self.sessions().bind(conn, code);
            return Ok(());
        }
    }

    /// Removes `conn` from `code` and destroys the room if it emptied.
    fn leave(&self, conn: ConnectionId, code: &RoomCode) -> Result<(), RoomError> {
        let shared = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::RoomGone(code.clone()))?;
        let closed = {
            let mut room = lock_unpoisoned(&shared);
            let out = self.engine.leave(&mut room, conn)?;
            self.publish(code, out);
            room.is_closed()
        };
        // Room lock released: the registry lock comes first in lock order.
        if closed {
            self.rooms.remove(code, &shared);
        }
        Ok(())
    }

    /// Runs `op` on `conn`'s room under its lock and publishes the result.
    fn with_room(
        &self,
        conn: ConnectionId,
        op: impl FnOnce(&mut Room) -> Result<Vec<Outbound>, RoomError>,
    ) -> Result<(), RoomError> {
        let code = self
            .room_of(conn)
            .ok_or(RoomError::UnknownConnection(conn))?;
        let shared = self
            .rooms
            .get(&code)
            .ok_or_else(|| RoomError::RoomGone(code.clone()))?;
        let mut room = lock_unpoisoned(&shared);
        let out = op(&mut room)?;
        self.publish(&code, out);
        Ok(())
    }

    fn publish(&self, code: &RoomCode, messages: Vec<Outbound>) {
        for message in messages {
            self.broadcaster.broadcast(code, message);
        }
    }

    fn settle(
        &self,
        event: &'static str,
        conn: ConnectionId,
        result: Result<(), RoomError>,
    ) {
        if let Err(reason) = result {
            tracing::debug!(event, %conn, %reason, "event dropped");
        }
    }

    fn sessions(&self) -> MutexGuard<'_, SessionIndex> {
        lock_unpoisoned(&self.sessions)
    }
}

/// Trims `value`, rejecting a missing or blank one as `field`.
fn non_blank<'a>(
    value: Option<&'a str>,
    field: &'static str,
) -> Result<&'a str, RoomError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(RoomError::MissingField(field))
}
