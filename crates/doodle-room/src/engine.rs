//! The round state machine.
//!
//! Every method takes the room by `&mut` and returns the messages to
//! publish, in order. The caller holds the room's lock for the whole call
//! and publishes before releasing it, so the check-then-act steps here
//! (all ready and no drawer yet; correct guess then next round) can never
//! interleave with another event on the same room.

use doodle_protocol::{
    ChatMessage, ClientId, ConnectionId, DrawEvent, Outbound, PlayerStatus,
    WordMessage,
};

use crate::{Player, Room, RoomConfig, RoomError, Vocabulary, catch_up};

/// Applies player actions to rooms.
#[derive(Debug, Clone)]
pub struct RoundEngine {
    vocabulary: Vocabulary,
    system_id: ClientId,
    system_name: String,
}

impl RoundEngine {
    /// Builds an engine from the room configuration.
    ///
    /// # Errors
    /// Returns [`RoomError::EmptyVocabulary`] if the word list has no
    /// usable word.
    pub fn new(config: &RoomConfig) -> Result<Self, RoomError> {
        Ok(Self {
            vocabulary: Vocabulary::new(&config.words)?,
            system_id: ClientId::new(config.system_client_id.clone()),
            system_name: config.system_name.clone(),
        })
    }

    /// The reserved identity system messages are sent as.
    pub fn system_id(&self) -> &ClientId {
        &self.system_id
    }

    /// Adds a player, then replays the room to them, then announces them.
    pub fn join(
        &self,
        room: &mut Room,
        conn: ConnectionId,
        client_id: ClientId,
        name: String,
    ) -> Vec<Outbound> {
        let player = Player::new(client_id.clone(), name);
        room.add_player(conn, player.clone());

        let mut out = catch_up(room, conn, &client_id);
        out.push(Outbound::Status(player.status(PlayerStatus::Joined, None)));

        tracing::info!(
            code = %room.code(),
            %conn,
            %client_id,
            name = player.name(),
            players = room.len(),
            "player joined"
        );
        out
    }

    /// Marks `conn` ready. Starts the first round once everyone is ready
    /// and nobody is drawing yet.
    ///
    /// # Errors
    /// [`RoomError::UnknownConnection`] if `conn` is not in `room`.
    pub fn ready(
        &self,
        room: &mut Room,
        conn: ConnectionId,
    ) -> Result<Vec<Outbound>, RoomError> {
        let player = room
            .mark_ready(conn)
            .cloned()
            .ok_or(RoomError::UnknownConnection(conn))?;

        let mut out =
            vec![Outbound::Status(player.status(PlayerStatus::Ready, None))];
        if room.drawer().is_none() && room.is_ready() {
            out.extend(self.start_next_round(room));
        }
        Ok(out)
    }

    /// Checks a guess against the word.
    ///
    /// A match scores one point for the guesser and moves on to the next
    /// round. Anything else (including any guess made before the first
    /// round) is relayed as chat.
    ///
    /// # Errors
    /// - [`RoomError::MissingField`] if `text` is blank
    /// - [`RoomError::UnknownConnection`] if `conn` is not in `room`
    pub fn guess(
        &self,
        room: &mut Room,
        conn: ConnectionId,
        text: &str,
    ) -> Result<Vec<Outbound>, RoomError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RoomError::MissingField("text"));
        }
        let guesser = room
            .player(conn)
            .cloned()
            .ok_or(RoomError::UnknownConnection(conn))?;

        let word = match room.word() {
            Some(word) if word.to_lowercase() == text.to_lowercase() => {
                word.to_string()
            }
            _ => {
                return Ok(vec![Outbound::Chat(ChatMessage {
                    client_id: guesser.client_id().clone(),
                    name: guesser.name().to_string(),
                    text: text.to_string(),
                    target_client_id: None,
                })]);
            }
        };

        let scorer = room
            .replace_player(conn, Player::with_point)
            .cloned()
            .ok_or(RoomError::UnknownConnection(conn))?;
        tracing::info!(
            code = %room.code(),
            client_id = %scorer.client_id(),
            score = scorer.score(),
            "word guessed"
        );

        let mut out = vec![
            Outbound::Status(scorer.status(PlayerStatus::Scored, None)),
            self.system_chat(
                format!("{} guessed the word: {}", scorer.name(), word),
                None,
            ),
        ];
        out.extend(self.start_next_round(room));
        Ok(out)
    }

    /// Relays a stroke if `conn` belongs to the current drawer.
    ///
    /// # Errors
    /// - [`RoomError::UnknownConnection`] if `conn` is not in `room`
    /// - [`RoomError::NotDrawer`] for anyone but the drawer
    pub fn draw(
        &self,
        room: &Room,
        conn: ConnectionId,
        event: DrawEvent,
    ) -> Result<Vec<Outbound>, RoomError> {
        let player = room
            .player(conn)
            .ok_or(RoomError::UnknownConnection(conn))?;
        if room.drawer() != Some(player.client_id()) {
            return Err(RoomError::NotDrawer {
                conn,
                client_id: player.client_id().clone(),
            });
        }
        Ok(vec![Outbound::Draw(event)])
    }

    /// Removes `conn`'s player and announces the departure.
    ///
    /// If the drawer leaves and no other connection carries the same
    /// client id, the round is cleared. A new round is not started; the
    /// next ready from a fully ready room starts one.
    ///
    /// # Errors
    /// [`RoomError::UnknownConnection`] if `conn` is not in `room`.
    pub fn leave(
        &self,
        room: &mut Room,
        conn: ConnectionId,
    ) -> Result<Vec<Outbound>, RoomError> {
        let player = room
            .remove_player(conn)
            .ok_or(RoomError::UnknownConnection(conn))?;

        let was_drawer = room.drawer() == Some(player.client_id());
        if was_drawer && room.find_by_client(player.client_id()).is_none() {
            room.clear_round();
            tracing::info!(
                code = %room.code(),
                client_id = %player.client_id(),
                "drawer left, round cleared"
            );
        }
        tracing::info!(
            code = %room.code(),
            %conn,
            client_id = %player.client_id(),
            players = room.len(),
            "player left"
        );
        Ok(vec![Outbound::Status(player.status(PlayerStatus::Left, None))])
    }

    /// Hands the pen to the next player in join order with a fresh word.
    ///
    /// Publishes, in order: the DRAWING status, a canvas clear, the
    /// "is drawing" announcement, then the word to the drawer alone (as
    /// a chat line and on the word channel). Empty rooms get nothing.
    pub fn start_next_round(&self, room: &mut Room) -> Vec<Outbound> {
        let current = room.drawer().cloned();
        let Some(drawer) = room
            .pick_next_drawer(current.as_ref())
            .and_then(|conn| room.player(conn))
            .cloned()
        else {
            return Vec::new();
        };
        let word = self.vocabulary.choose().to_string();
        room.assign_round(drawer.client_id().clone(), word.clone());

        tracing::info!(
            code = %room.code(),
            drawer = %drawer.client_id(),
            "round started"
        );

        let target = drawer.client_id();
        vec![
            Outbound::Status(drawer.status(PlayerStatus::Drawing, None)),
            Outbound::Draw(DrawEvent::clear(self.system_id.as_str())),
            self.system_chat(format!("{} is drawing.", drawer.name()), None),
            self.system_chat(format!("Your word is {word}."), Some(target)),
            Outbound::Word(WordMessage {
                word,
                target_client_id: target.clone(),
            }),
        ]
    }

    fn system_chat(&self, text: String, target: Option<&ClientId>) -> Outbound {
        Outbound::Chat(ChatMessage {
            client_id: self.system_id.clone(),
            name: self.system_name.clone(),
            text,
            target_client_id: target.cloned(),
        })
    }
}

impl Default for RoundEngine {
    fn default() -> Self {
        let config = RoomConfig::default();
        Self {
            vocabulary: Vocabulary::default(),
            system_id: ClientId::new(config.system_client_id),
            system_name: config.system_name,
        }
    }
}
