//! The outbound seam between the game and whatever delivers messages.

use std::sync::Arc;

use doodle_protocol::{Outbound, RoomCode};

/// Delivers a message to everyone listening on one of a room's channels.
///
/// Called while the room's lock is held, once per message and in the
/// order the room produced them. Implementations must not block and must
/// not call back into the game service. Delivery is fire-and-forget:
/// there is nothing to report back if a recipient is gone.
pub trait Broadcaster: Send + Sync + 'static {
    fn broadcast(&self, code: &RoomCode, message: Outbound);
}

impl<B: Broadcaster> Broadcaster for Arc<B> {
    fn broadcast(&self, code: &RoomCode, message: Outbound) {
        (**self).broadcast(code, message);
    }
}
