//! The session index: which room each live connection is in.
//!
//! # Concurrency note
//!
//! `SessionIndex` is a plain map and is not thread-safe by itself. The
//! game service keeps it behind a mutex that is only ever held for a
//! single lookup or update, never while a room is locked.

use std::collections::HashMap;

use doodle_protocol::{ConnectionId, RoomCode};

/// Maps each live connection to the room code it joined.
///
/// One entry per connection. The entry is the authority on what to clean
/// up when that connection goes away.
#[derive(Debug, Default)]
pub struct SessionIndex {
    bindings: HashMap<ConnectionId, RoomCode>,
}

impl SessionIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `conn` is in `code`, replacing any previous binding.
    ///
    /// Returns the code the connection was bound to before, if any.
    pub fn bind(
        &mut self,
        conn: ConnectionId,
        code: RoomCode,
    ) -> Option<RoomCode> {
        tracing::debug!(%conn, %code, "session bound");
        self.bindings.insert(conn, code)
    }

    /// Returns the room `conn` is in.
    pub fn resolve(&self, conn: ConnectionId) -> Option<&RoomCode> {
        self.bindings.get(&conn)
    }

    /// Forgets `conn`, returning the room it was in.
    ///
    /// A second call for the same connection returns `None`, so cleanup
    /// driven by this value runs at most once.
    pub fn unbind(&mut self, conn: ConnectionId) -> Option<RoomCode> {
        let code = self.bindings.remove(&conn);
        if let Some(code) = &code {
            tracing::debug!(%conn, %code, "session unbound");
        }
        code
    }

    /// Number of bound connections.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if no connection is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
