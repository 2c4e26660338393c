//! Catch-up replay for players joining a room mid-game.

use doodle_protocol::{ClientId, ConnectionId, Outbound, PlayerStatus};

use crate::Room;

/// The status events `newcomer` needs to rebuild the room's current state.
///
/// For every other player, in join order: a JOINED event, then a READY
/// event if that player is ready. Last, a DRAWING event for the current
/// drawer if there is one. Every event is addressed to `target` only.
pub fn catch_up(
    room: &Room,
    newcomer: ConnectionId,
    target: &ClientId,
) -> Vec<Outbound> {
    let mut events = Vec::new();
    for (conn, player) in room.players() {
        if conn == newcomer {
            continue;
        }
        events.push(Outbound::Status(
            player.status(PlayerStatus::Joined, Some(target)),
        ));
        if player.is_ready() {
            events.push(Outbound::Status(
                player.status(PlayerStatus::Ready, Some(target)),
            ));
        }
    }
    if let Some(drawer) = room.drawer().and_then(|id| room.find_by_client(id)) {
        events.push(Outbound::Status(
            drawer.status(PlayerStatus::Drawing, Some(target)),
        ));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Player;

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn statuses(events: &[Outbound]) -> Vec<(String, PlayerStatus)> {
        events
            .iter()
            .map(|e| match e {
                Outbound::Status(s) => (s.client_id.to_string(), s.status),
                other => panic!("unexpected {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_catch_up_for_first_player_is_empty() {
        let mut room = Room::new("room1".into());
        room.add_player(conn(1), Player::new("c1".into(), "A"));
        assert!(catch_up(&room, conn(1), &"c1".into()).is_empty());
    }

    #[test]
    fn test_catch_up_lists_others_with_ready_flags() {
        let mut room = Room::new("room1".into());
        room.add_player(conn(1), Player::new("c1".into(), "A"));
        room.add_player(conn(2), Player::new("c2".into(), "B"));
        room.mark_ready(conn(2));
        room.add_player(conn(3), Player::new("c3".into(), "C"));

        let events = catch_up(&room, conn(3), &"c3".into());
        assert_eq!(
            statuses(&events),
            vec![
                ("c1".to_string(), PlayerStatus::Joined),
                ("c2".to_string(), PlayerStatus::Joined),
                ("c2".to_string(), PlayerStatus::Ready),
            ]
        );
        assert!(
            events
                .iter()
                .all(|e| e.target() == Some(&ClientId::new("c3")))
        );
    }

    #[test]
    fn test_catch_up_ends_with_current_drawer() {
        let mut room = Room::new("room1".into());
        room.add_player(conn(1), Player::new("c1".into(), "A").with_point());
        room.assign_round("c1".into(), "Cat".into());
        room.add_player(conn(2), Player::new("c2".into(), "B"));

        let events = catch_up(&room, conn(2), &"c2".into());
        let Some(Outbound::Status(last)) = events.last() else {
            panic!("expected a status event");
        };
        assert_eq!(last.status, PlayerStatus::Drawing);
        assert_eq!(last.client_id.as_str(), "c1");
        assert_eq!(last.name, "A");
        assert_eq!(last.score, 1);
        assert_eq!(last.target_client_id, Some(ClientId::new("c2")));
    }
}
