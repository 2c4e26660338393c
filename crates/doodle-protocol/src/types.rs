//! Core protocol types for Doodle's wire format.
//!
//! Everything here is serialized to JSON text and exchanged with browsers.
//! Field names are camelCase on the wire (`clientId`, `targetClientId`)
//! because that is what the web client reads.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The stable, client-generated identity of a player.
///
/// Survives reconnects, unlike a [`ConnectionId`](crate::ConnectionId).
/// Scores, drawer comparison and turn rotation all key on this.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Wraps a raw client id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The shared code players type in to meet in the same room.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Wraps a raw room code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

// ---------------------------------------------------------------------------
// Channel: which per-room topic a message travels on
// ---------------------------------------------------------------------------

/// One of the four logical channels every room has.
///
/// Each channel maps to its own subscription destination so a client can
/// listen to, say, chat without receiving every pen stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Player status changes (joined, ready, drawing, scored, left).
    Players,
    /// Guesses and system announcements.
    Chat,
    /// The secret word, addressed to the drawer.
    Word,
    /// Drawing strokes from the current drawer.
    Draw,
}

impl Channel {
    /// All channels, in a fixed order.
    pub const ALL: [Channel; 4] =
        [Channel::Players, Channel::Chat, Channel::Word, Channel::Draw];

    /// The path segment used in destinations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Players => "players",
            Self::Chat => "chat",
            Self::Word => "word",
            Self::Draw => "draw",
        }
    }

    /// The subscription destination of this channel in `code`'s room,
    /// e.g. `/topic/lobby/room1/players`.
    pub fn destination(&self, code: &RoomCode) -> String {
        format!("/topic/lobby/{}/{}", code, self.as_str())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Outbound messages
// ---------------------------------------------------------------------------

/// A player's status transition, as announced on the players channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStatus {
    Joined,
    Ready,
    Drawing,
    Left,
    Scored,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Joined => "JOINED",
            Self::Ready => "READY",
            Self::Drawing => "DRAWING",
            Self::Left => "LEFT",
            Self::Scored => "SCORED",
        };
        f.write_str(s)
    }
}

/// Status update for one player.
///
/// `target_client_id` set means only that client should render it (the
/// catch-up replay uses this); `None` means everyone in the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatusMessage {
    pub client_id: ClientId,
    pub name: String,
    pub target_client_id: Option<ClientId>,
    pub status: PlayerStatus,
    pub score: u32,
}

/// A chat line: either a relayed guess or a system announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub client_id: ClientId,
    pub name: String,
    pub text: String,
    pub target_client_id: Option<ClientId>,
}

/// The secret word, always addressed to the drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordMessage {
    pub word: String,
    pub target_client_id: ClientId,
}

/// One drawing stroke event. Relayed verbatim; the server never looks at
/// the coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawEvent {
    /// Stroke phase as the client names it (`start`, `move`, `end`,
    /// `clear`).
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub source_id: String,
}

impl DrawEvent {
    /// The stroke kind that tells clients to wipe the canvas.
    pub const CLEAR: &'static str = "clear";

    /// A canvas-clear event attributed to `source_id`.
    pub fn clear(source_id: impl Into<String>) -> Self {
        Self {
            kind: Self::CLEAR.to_string(),
            x: 0.0,
            y: 0.0,
            source_id: source_id.into(),
        }
    }
}

/// Anything the server publishes into a room.
///
/// Serialized untagged: the destination a frame arrives on already tells
/// the client which shape to expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outbound {
    Status(PlayerStatusMessage),
    Chat(ChatMessage),
    Word(WordMessage),
    Draw(DrawEvent),
}

impl Outbound {
    /// The channel this message is published on.
    pub fn channel(&self) -> Channel {
        match self {
            Self::Status(_) => Channel::Players,
            Self::Chat(_) => Channel::Chat,
            Self::Word(_) => Channel::Word,
            Self::Draw(_) => Channel::Draw,
        }
    }

    /// The client this message is addressed to, if any.
    pub fn target(&self) -> Option<&ClientId> {
        match self {
            Self::Status(m) => m.target_client_id.as_ref(),
            Self::Chat(m) => m.target_client_id.as_ref(),
            Self::Word(m) => Some(&m.target_client_id),
            Self::Draw(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// Server → client frame: one published message and where it was published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerFrame {
    pub destination: String,
    pub payload: Outbound,
}

/// Client → server frame.
///
/// Fields a client may leave out are `Option`s; the game layer decides
/// what a missing or blank value means (it drops the event).
///
/// ```text
/// { "type": "Join", "code": "room1", "clientId": "c1" }
/// { "type": "Guess", "text": "cat" }
/// { "type": "Draw", "event": { "type": "move", "x": 1, "y": 2, "sourceId": "c1" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ClientFrame {
    /// Start receiving frames published on `destination`.
    Subscribe { destination: String },

    /// Stop receiving frames published on `destination`.
    Unsubscribe { destination: String },

    /// Enter the room with the given code.
    Join {
        code: Option<String>,
        client_id: Option<String>,
    },

    /// Mark this connection's player ready.
    Ready,

    /// Submit a guess (or just chat).
    Guess { text: Option<String> },

    /// Submit a drawing stroke.
    Draw { event: DrawEvent },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ClientId::new("c-1")).unwrap();
        assert_eq!(json, "\"c-1\"");
    }

    #[test]
    fn test_channel_destinations() {
        let code = RoomCode::new("room1");
        assert_eq!(
            Channel::Players.destination(&code),
            "/topic/lobby/room1/players"
        );
        assert_eq!(Channel::Chat.destination(&code), "/topic/lobby/room1/chat");
        assert_eq!(Channel::Word.destination(&code), "/topic/lobby/room1/word");
        assert_eq!(Channel::Draw.destination(&code), "/topic/lobby/room1/draw");
    }

    #[test]
    fn test_player_status_message_json_shape() {
        let msg = PlayerStatusMessage {
            client_id: "c1".into(),
            name: "Brisk Fox".into(),
            target_client_id: Some("c2".into()),
            status: PlayerStatus::Ready,
            score: 3,
        };
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["clientId"], "c1");
        assert_eq!(json["name"], "Brisk Fox");
        assert_eq!(json["targetClientId"], "c2");
        assert_eq!(json["status"], "READY");
        assert_eq!(json["score"], 3);
    }

    #[test]
    fn test_unaddressed_message_has_null_target() {
        let msg = ChatMessage {
            client_id: "system".into(),
            name: "System".into(),
            text: "hi".into(),
            target_client_id: None,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json["targetClientId"].is_null());
    }

    #[test]
    fn test_draw_event_uses_type_and_source_id() {
        let json = r#"{"type":"move","x":1.5,"y":2,"sourceId":"c1"}"#;
        let event: DrawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, "move");
        assert_eq!(event.x, 1.5);
        assert_eq!(event.source_id, "c1");

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["type"], "move");
        assert_eq!(back["sourceId"], "c1");
    }

    #[test]
    fn test_outbound_routes_to_channel_by_kind() {
        let word = Outbound::Word(WordMessage {
            word: "Cat".into(),
            target_client_id: "c1".into(),
        });
        assert_eq!(word.channel(), Channel::Word);
        assert_eq!(word.target(), Some(&ClientId::new("c1")));

        let clear = Outbound::Draw(DrawEvent::clear("system"));
        assert_eq!(clear.channel(), Channel::Draw);
        assert_eq!(clear.target(), None);
    }

    #[test]
    fn test_outbound_is_untagged_on_the_wire() {
        let status = Outbound::Status(PlayerStatusMessage {
            client_id: "c1".into(),
            name: "n".into(),
            target_client_id: None,
            status: PlayerStatus::Left,
            score: 0,
        });
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "LEFT");
        assert!(json.get("Status").is_none());
    }

    #[test]
    fn test_client_frame_join_with_missing_fields() {
        let frame: ClientFrame =
            serde_json::from_str(r#"{"type":"Join","code":"room1"}"#).unwrap();
        assert_eq!(
            frame,
            ClientFrame::Join {
                code: Some("room1".into()),
                client_id: None,
            }
        );
    }

    #[test]
    fn test_client_frame_join_reads_camel_case_client_id() {
        let frame: ClientFrame = serde_json::from_str(
            r#"{"type":"Join","code":"room1","clientId":"c1"}"#,
        )
        .unwrap();
        assert!(matches!(
            frame,
            ClientFrame::Join { client_id: Some(ref id), .. } if id == "c1"
        ));
    }

    #[test]
    fn test_client_frame_guess_with_null_text() {
        let frame: ClientFrame =
            serde_json::from_str(r#"{"type":"Guess","text":null}"#).unwrap();
        assert_eq!(frame, ClientFrame::Guess { text: None });
    }

    #[test]
    fn test_client_frame_unknown_type_is_rejected() {
        let result: Result<ClientFrame, _> =
            serde_json::from_str(r#"{"type":"FlyToMoon"}"#);
        assert!(result.is_err());
    }
}
