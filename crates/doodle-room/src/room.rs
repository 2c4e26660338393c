//! The room: players in join order, the drawer slot, and the secret word.
//!
//! `Room` is plain data with no locking of its own. Callers reach it
//! through [`RoomRegistry`](crate::RoomRegistry), which hands out one mutex
//! per room.

use doodle_protocol::{ClientId, ConnectionId, RoomCode};

use crate::Player;

/// One game instance.
///
/// Invariants kept by the methods here and by
/// [`RoundEngine`](crate::RoundEngine):
///
/// - each connection id appears at most once in `players`;
/// - `drawer` is `Some` only while a player with that client id is present;
/// - `word` is `Some` exactly when `drawer` is.
#[derive(Debug)]
pub struct Room {
    code: RoomCode,
    /// Join order. Drawer rotation walks this sequence.
    players: Vec<(ConnectionId, Player)>,
    drawer: Option<ClientId>,
    word: Option<String>,
    /// Set when the last player leaves. A closed room is never reused.
    closed: bool,
}

impl Room {
    /// Creates an empty, open room.
    pub fn new(code: RoomCode) -> Self {
        Self {
            code,
            players: Vec::new(),
            drawer: None,
            word: None,
            closed: false,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Adds a player at the end of the join order.
    ///
    /// If `conn` is already present its player is replaced where it
    /// stands, so connection ids stay unique.
    pub fn add_player(&mut self, conn: ConnectionId, player: Player) {
        debug_assert!(!self.closed, "joining a closed room");
        match self.position(conn) {
            Some(i) => self.players[i].1 = player,
            None => self.players.push((conn, player)),
        }
    }

    /// Removes `conn`'s player. Closes the room if it is now empty.
    pub fn remove_player(&mut self, conn: ConnectionId) -> Option<Player> {
        let i = self.position(conn)?;
        let (_, player) = self.players.remove(i);
        if self.players.is_empty() {
            self.closed = true;
        }
        Some(player)
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` once the last player has left.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn player(&self, conn: ConnectionId) -> Option<&Player> {
        self.players
            .iter()
            .find(|(c, _)| *c == conn)
            .map(|(_, p)| p)
    }

    /// The first player, in join order, with the given client id.
    pub fn find_by_client(&self, client_id: &ClientId) -> Option<&Player> {
        self.players
            .iter()
            .map(|(_, p)| p)
            .find(|p| p.client_id() == client_id)
    }

    /// Players in join order.
    pub fn players(&self) -> impl Iterator<Item = (ConnectionId, &Player)> {
        self.players.iter().map(|(c, p)| (*c, p))
    }

    /// Swaps in a ready copy of `conn`'s player. Returns the new snapshot,
    /// or `None` (and changes nothing) if `conn` is not here.
    pub fn mark_ready(&mut self, conn: ConnectionId) -> Option<&Player> {
        self.replace_player(conn, Player::with_ready)
    }

    /// Swaps `conn`'s player for `update(old)`.
    pub(crate) fn replace_player(
        &mut self,
        conn: ConnectionId,
        update: impl FnOnce(&Player) -> Player,
    ) -> Option<&Player> {
        let i = self.position(conn)?;
        let next = update(&self.players[i].1);
        self.players[i].1 = next;
        Some(&self.players[i].1)
    }

    /// `true` iff the room has players and every one of them is ready.
    pub fn is_ready(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|(_, p)| p.is_ready())
    }

    /// The connection that draws after `current`.
    ///
    /// Walks the join order: the player after the first one whose client
    /// id is `current`, wrapping past the end. With no current drawer, or
    /// one that is no longer here, the first player is chosen. `None` only
    /// for an empty room.
    pub fn pick_next_drawer(
        &self,
        current: Option<&ClientId>,
    ) -> Option<ConnectionId> {
        let first = self.players.first().map(|(c, _)| *c)?;
        let Some(current) = current else {
            return Some(first);
        };
        let next = self
            .players
            .iter()
            .position(|(_, p)| p.client_id() == current)
            .and_then(|i| self.players.get(i + 1))
            .map(|(c, _)| *c);
        Some(next.unwrap_or(first))
    }

    pub fn drawer(&self) -> Option<&ClientId> {
        self.drawer.as_ref()
    }

    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    /// Starts a round: `drawer` draws `word`.
    pub(crate) fn assign_round(&mut self, drawer: ClientId, word: String) {
        self.drawer = Some(drawer);
        self.word = Some(word);
    }

    /// Empties the drawer slot and the word together.
    pub(crate) fn clear_round(&mut self) {
        self.drawer = None;
        self.word = None;
    }

    fn position(&self, conn: ConnectionId) -> Option<usize> {
        self.players.iter().position(|(c, _)| *c == conn)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn player(client: &str, name: &str) -> Player {
        Player::new(client.into(), name)
    }

    fn room_with(players: &[(u64, &str)]) -> Room {
        let mut room = Room::new("room1".into());
        for (id, client) in players {
            room.add_player(conn(*id), player(client, client));
        }
        room
    }

    // -- add / remove / is_empty --

    #[test]
    fn test_new_room_is_empty_and_open() {
        let room = Room::new("room1".into());
        assert!(room.is_empty());
        assert!(!room.is_closed());
        assert_eq!(room.drawer(), None);
        assert_eq!(room.word(), None);
    }

    #[test]
    fn test_add_player_makes_room_non_empty() {
        let room = room_with(&[(1, "c1")]);
        assert!(!room.is_empty());
        assert_eq!(room.len(), 1);
    }

    #[test]
    fn test_remove_player_returns_player_and_closes_room() {
        let mut room = Room::new("room1".into());
        let p = player("c1", "Alice");
        room.add_player(conn(1), p.clone());

        assert_eq!(room.remove_player(conn(1)), Some(p));
        assert!(room.is_empty());
        assert!(room.is_closed());
    }

    #[test]
    fn test_remove_unknown_player_returns_none() {
        let mut room = room_with(&[(1, "c1")]);
        assert_eq!(room.remove_player(conn(9)), None);
        assert!(!room.is_closed());
    }

    #[test]
    fn test_add_existing_connection_replaces_in_place() {
        let mut room = room_with(&[(1, "c1"), (2, "c2")]);
        room.add_player(conn(1), player("c9", "Zed"));

        let order: Vec<_> = room
            .players()
            .map(|(_, p)| p.client_id().as_str().to_string())
            .collect();
        assert_eq!(order, vec!["c9", "c2"]);
    }

    // -- mark_ready / is_ready --

    #[test]
    fn test_mark_ready_sets_flag_and_preserves_score() {
        let mut room = Room::new("room1".into());
        room.add_player(conn(1), player("c1", "Alice").with_point().with_point());

        let updated = room.mark_ready(conn(1)).cloned().unwrap();
        assert!(updated.is_ready());
        assert_eq!(updated.score(), 2);
        assert_eq!(room.player(conn(1)), Some(&updated));
    }

    #[test]
    fn test_mark_ready_unknown_connection_is_noop() {
        let mut room = room_with(&[(1, "c1")]);
        assert!(room.mark_ready(conn(2)).is_none());
        assert!(!room.player(conn(1)).unwrap().is_ready());
    }

    #[test]
    fn test_is_ready_false_when_empty() {
        assert!(!Room::new("room1".into()).is_ready());
    }

    #[test]
    fn test_is_ready_false_when_not_all_ready() {
        let mut room = room_with(&[(1, "c1"), (2, "c2")]);
        room.mark_ready(conn(1));
        assert!(!room.is_ready());
    }

    #[test]
    fn test_is_ready_true_when_all_ready() {
        let mut room = room_with(&[(1, "c1"), (2, "c2")]);
        room.mark_ready(conn(1));
        room.mark_ready(conn(2));
        assert!(room.is_ready());
    }

    // -- pick_next_drawer --

    #[test]
    fn test_pick_next_drawer_empty_room_is_none() {
        let room = Room::new("room1".into());
        assert_eq!(room.pick_next_drawer(None), None);
        assert_eq!(room.pick_next_drawer(Some(&"c1".into())), None);
    }

    #[test]
    fn test_pick_next_drawer_without_current_is_first_joined() {
        let room = room_with(&[(5, "c5"), (2, "c2"), (9, "c9")]);
        assert_eq!(room.pick_next_drawer(None), Some(conn(5)));
    }

    #[test]
    fn test_pick_next_drawer_follows_join_order_and_wraps() {
        let room = room_with(&[(5, "c5"), (2, "c2"), (9, "c9")]);
        assert_eq!(room.pick_next_drawer(Some(&"c5".into())), Some(conn(2)));
        assert_eq!(room.pick_next_drawer(Some(&"c2".into())), Some(conn(9)));
        assert_eq!(room.pick_next_drawer(Some(&"c9".into())), Some(conn(5)));
    }

    #[test]
    fn test_pick_next_drawer_single_player_returns_self() {
        let room = room_with(&[(1, "c1")]);
        assert_eq!(room.pick_next_drawer(Some(&"c1".into())), Some(conn(1)));
    }

    #[test]
    fn test_pick_next_drawer_unknown_client_returns_first() {
        let room = room_with(&[(1, "c1"), (2, "c2")]);
        assert_eq!(
            room.pick_next_drawer(Some(&"unknown".into())),
            Some(conn(1))
        );
    }

    #[test]
    fn test_pick_next_drawer_is_a_full_cycle() {
        let room = room_with(&[(1, "c1"), (2, "c2"), (3, "c3"), (4, "c4")]);
        let start = room.pick_next_drawer(None).unwrap();
        let client_of =
            |c: ConnectionId| room.player(c).unwrap().client_id().clone();

        let mut visited = HashSet::new();
        let mut current = client_of(start);
        visited.insert(current.clone());
        for _ in 0..3 {
            let next = room.pick_next_drawer(Some(&current)).unwrap();
            current = client_of(next);
            assert!(visited.insert(current.clone()), "revisited {current}");
        }
        let back = room.pick_next_drawer(Some(&current)).unwrap();
        assert_eq!(back, start);
        assert_eq!(visited.len(), 4);
    }

    #[test]
    fn test_pick_next_drawer_skips_removed_players() {
        let mut room = room_with(&[(1, "c1"), (2, "c2"), (3, "c3")]);
        room.remove_player(conn(2));
        assert_eq!(room.pick_next_drawer(Some(&"c1".into())), Some(conn(3)));
    }

    // -- round slots --

    #[test]
    fn test_assign_and_clear_round_move_together() {
        let mut room = room_with(&[(1, "c1")]);
        room.assign_round("c1".into(), "Cat".into());
        assert_eq!(room.drawer(), Some(&ClientId::new("c1")));
        assert_eq!(room.word(), Some("Cat"));

        room.clear_round();
        assert_eq!(room.drawer(), None);
        assert_eq!(room.word(), None);
    }

    #[test]
    fn test_find_by_client_returns_first_match() {
        let mut room = Room::new("room1".into());
        room.add_player(conn(1), player("c1", "First"));
        room.add_player(conn(2), player("c1", "Second"));
        assert_eq!(room.find_by_client(&"c1".into()).unwrap().name(), "First");
    }
}
