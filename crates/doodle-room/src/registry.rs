//! Room registry: rooms by code, each behind its own mutex.
//!
//! # Lock order
//!
//! The registry map lock is only held for a lookup or an insert, never
//! while waiting on a room, so a busy room can't stall lookups for the
//! others. Code holding a room lock must release it before touching the
//! registry again (see [`RoomRegistry::remove`]).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use doodle_protocol::RoomCode;

use crate::Room;

/// A room shared between every connection in it.
pub type SharedRoom = Arc<Mutex<Room>>;

/// Locks `mutex`, recovering the data if a previous holder panicked.
///
/// Room and session state is updated by whole-value swaps, so a panic
/// can't leave a half-written player behind.
pub fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("recovering poisoned lock");
        poisoned.into_inner()
    })
}

/// All live rooms, keyed by code.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomCode, SharedRoom>>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the room for `code`, if one is live.
    pub fn get(&self, code: &RoomCode) -> Option<SharedRoom> {
        lock_unpoisoned(&self.rooms).get(code).cloned()
    }

    /// Returns the open room for `code`, creating it if there is none.
    ///
    /// A room that closed but has not been removed yet is replaced. The
    /// returned room can still close before the caller locks it; callers
    /// check [`Room::is_closed`] under the room lock and retry.
    pub fn open(&self, code: &RoomCode) -> SharedRoom {
        loop {
            let seen = self.get(code);
            if let Some(room) = &seen {
                // Map lock already released: this may wait on the room.
                if !lock_unpoisoned(room).is_closed() {
                    return Arc::clone(room);
                }
            }

            let mut rooms = lock_unpoisoned(&self.rooms);
            let unchanged = match (rooms.get(code), &seen) {
                (None, None) => true,
                (Some(current), Some(closed)) => Arc::ptr_eq(current, closed),
                _ => false,
            };
            if unchanged {
                let room = Arc::new(Mutex::new(Room::new(code.clone())));
                rooms.insert(code.clone(), Arc::clone(&room));
                tracing::info!(%code, "room created");
                return room;
            }
            // Another caller replaced or removed the entry; look again.
        }
    }

    /// Removes `code` if it still maps to `room`.
    ///
    /// Returns `false` when the entry is gone or already points at a newer
    /// room for the same code.
    pub fn remove(&self, code: &RoomCode, room: &SharedRoom) -> bool {
        let mut rooms = lock_unpoisoned(&self.rooms);
        match rooms.get(code) {
            Some(current) if Arc::ptr_eq(current, room) => {
                rooms.remove(code);
                tracing::info!(%code, "room destroyed");
                true
            }
            _ => false,
        }
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        lock_unpoisoned(&self.rooms).len()
    }

    pub fn is_empty(&self) -> bool {
        lock_unpoisoned(&self.rooms).is_empty()
    }

    /// Codes of all live rooms, sorted.
    pub fn codes(&self) -> Vec<RoomCode> {
        let mut codes: Vec<_> =
            lock_unpoisoned(&self.rooms).keys().cloned().collect();
        codes.sort();
        codes
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use doodle_protocol::ConnectionId;

    use super::*;
    use crate::Player;

    fn code(s: &str) -> RoomCode {
        RoomCode::new(s)
    }

    #[test]
    fn test_open_creates_once_per_code() {
        let registry = RoomRegistry::new();
        let a = registry.open(&code("room1"));
        let b = registry.open(&code("room1"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rooms_with_different_codes_are_independent() {
        let registry = RoomRegistry::new();
        let a = registry.open(&code("room1"));
        let b = registry.open(&code("room2"));
        assert!(!Arc::ptr_eq(&a, &b));

        // Holding one room's lock doesn't block the other.
        let _held = lock_unpoisoned(&a);
        assert!(lock_unpoisoned(&b).is_empty());
        assert_eq!(registry.codes(), vec![code("room1"), code("room2")]);
    }

    #[test]
    fn test_get_unknown_code_is_none() {
        assert!(RoomRegistry::new().get(&code("nope")).is_none());
    }

    #[test]
    fn test_open_replaces_closed_room() {
        let registry = RoomRegistry::new();
        let old = registry.open(&code("room1"));
        {
            let mut room = lock_unpoisoned(&old);
            room.add_player(ConnectionId::new(1), Player::new("c1".into(), "A"));
            room.remove_player(ConnectionId::new(1));
            assert!(room.is_closed());
        }

        let fresh = registry.open(&code("room1"));
        assert!(!Arc::ptr_eq(&old, &fresh));
        assert!(!lock_unpoisoned(&fresh).is_closed());
    }

    #[test]
    fn test_open_busy_room_does_not_block_other_lookups() {
        let registry = &RoomRegistry::new();
        let busy = registry.open(&code("room1"));
        registry.open(&code("room2"));

        let held = lock_unpoisoned(&busy);
        let looked_up = thread::scope(|s| {
            let opener = s.spawn(|| registry.open(&code("room1")));
            // Give the opener time to park on room1.
            thread::sleep(Duration::from_millis(50));

            let (tx, rx) = mpsc::channel();
            s.spawn(move || {
                let _ = tx.send(registry.get(&code("room2")).is_some());
            });
            let looked_up = rx.recv_timeout(Duration::from_secs(2));
            drop(held);
            assert!(Arc::ptr_eq(&opener.join().unwrap(), &busy));
            looked_up
        });
        assert_eq!(looked_up, Ok(true));
    }

    #[test]
    fn test_remove_only_matching_room() {
        let registry = RoomRegistry::new();
        let stale = Arc::new(Mutex::new(Room::new(code("room1"))));
        let live = registry.open(&code("room1"));

        assert!(!registry.remove(&code("room1"), &stale));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(&code("room1"), &live));
        assert!(registry.is_empty());
        assert!(!registry.remove(&code("room1"), &live));
    }
}
