//! `TopicHub`: destination-based fan-out to connected sockets.
//!
//! Each connection registers an outbox (an unbounded channel drained by a
//! writer task) and subscribes to destinations such as
//! `/topic/lobby/room1/chat`. A broadcast is encoded once and pushed into
//! the outbox of every subscriber of the message's destination. Pushing
//! never blocks, so the hub is safe to call while a room is locked.
//!
//! Messages addressed to one client (`targetClientId`) only reach
//! connections that joined as that client.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use doodle_protocol::{
    ClientId, Codec, ConnectionId, JsonCodec, Outbound, RoomCode, ServerFrame,
};
use doodle_room::lock_unpoisoned;
use tokio::sync::mpsc;

use crate::Broadcaster;

#[derive(Debug, Default)]
struct HubState {
    outboxes: HashMap<ConnectionId, mpsc::UnboundedSender<String>>,
    identities: HashMap<ConnectionId, ClientId>,
    subscribers: HashMap<String, BTreeSet<ConnectionId>>,
}

/// Routes published room messages to subscribed connections.
#[derive(Debug, Default)]
pub struct TopicHub {
    state: Mutex<HubState>,
    codec: JsonCodec,
}

impl TopicHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `conn` and returns the receiving end of its outbox.
    pub fn register(&self, conn: ConnectionId) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state().outboxes.insert(conn, tx);
        rx
    }

    /// Forgets `conn`: its outbox closes and all its subscriptions go.
    pub fn unregister(&self, conn: ConnectionId) {
        let mut state = self.state();
        state.outboxes.remove(&conn);
        state.identities.remove(&conn);
        state.subscribers.retain(|_, subs| {
            subs.remove(&conn);
            !subs.is_empty()
        });
    }

    /// Records which client `conn` speaks for, so addressed messages can
    /// reach it.
    pub fn identify(&self, conn: ConnectionId, client_id: ClientId) {
        self.state().identities.insert(conn, client_id);
    }

    pub fn subscribe(&self, conn: ConnectionId, destination: String) {
        let mut state = self.state();
        if !state.outboxes.contains_key(&conn) {
            return;
        }
        tracing::debug!(%conn, %destination, "subscribed");
        state.subscribers.entry(destination).or_default().insert(conn);
    }

    pub fn unsubscribe(&self, conn: ConnectionId, destination: &str) {
        let mut state = self.state();
        if let Some(subs) = state.subscribers.get_mut(destination) {
            subs.remove(&conn);
            if subs.is_empty() {
                state.subscribers.remove(destination);
            }
        }
    }

    /// Number of connections subscribed to `destination`.
    pub fn subscriber_count(&self, destination: &str) -> usize {
        self.state()
            .subscribers
            .get(destination)
            .map_or(0, BTreeSet::len)
    }

    fn state(&self) -> MutexGuard<'_, HubState> {
        lock_unpoisoned(&self.state)
    }
}

impl Broadcaster for TopicHub {
    fn broadcast(&self, code: &RoomCode, message: Outbound) {
        let destination = message.channel().destination(code);
        let target = message.target().cloned();
        let frame = ServerFrame {
            destination,
            payload: message,
        };
        let text = match self.codec.encode(&frame) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%code, error = %e, "failed to encode frame");
                return;
            }
        };

        let state = self.state();
        let Some(subs) = state.subscribers.get(&frame.destination) else {
            return;
        };
        for conn in subs {
            if let Some(target) = &target {
                if state.identities.get(conn) != Some(target) {
                    continue;
                }
            }
            if let Some(outbox) = state.outboxes.get(conn) {
                // A closed outbox means the writer is gone; cleanup follows.
                let _ = outbox.send(text.clone());
            }
        }
    }
}
