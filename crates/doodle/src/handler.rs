//! Per-connection handler: frame decoding and routing.
//!
//! Each accepted connection gets its own Tokio task running this handler,
//! plus a writer task that drains the connection's hub outbox. The flow:
//!   1. Register with the hub → outbox for broadcasts
//!   2. Loop: receive frames → subscriptions go to the hub, game events
//!      to the service
//!   3. On exit (clean close, error or panic) the guard unregisters the
//!      connection and tells the service it is gone

use std::sync::Arc;

use doodle_protocol::{ClientFrame, ClientId, Codec, ConnectionId};
use doodle_transport::{Connection, WebSocketConnection};

use crate::DoodleError;
use crate::server::ServerState;

/// Drop guard that cleans up after a connection exactly once.
///
/// Unregistering first closes the outbox, which ends the writer task, and
/// keeps the LEFT broadcast from being queued for a socket that is gone.
struct DisconnectGuard {
    conn_id: ConnectionId,
    state: Arc<ServerState>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        self.state.hub.unregister(self.conn_id);
        self.state.service.disconnect(self.conn_id);
        tracing::debug!(conn_id = %self.conn_id, "connection cleaned up");
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), DoodleError> {
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let mut outbox = state.hub.register(conn_id);
    let _guard = DisconnectGuard {
        conn_id,
        state: Arc::clone(&state),
    };

    let writer = Arc::clone(&conn);
    tokio::spawn(async move {
        while let Some(text) = outbox.recv().await {
            if let Err(e) = writer.send(&text).await {
                tracing::debug!(%conn_id, error = %e, "send failed");
                break;
            }
        }
    });

    while let Some(data) = conn.recv().await? {
        let frame: ClientFrame = match state.codec.decode(&data) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode frame");
                continue;
            }
        };
        dispatch(&state, conn_id, frame);
    }

    tracing::info!(%conn_id, "connection closed cleanly");
    // _guard drops here → cleanup fires.
    Ok(())
}

/// Routes one decoded frame.
fn dispatch(state: &ServerState, conn_id: ConnectionId, frame: ClientFrame) {
    match frame {
        ClientFrame::Subscribe { destination } => {
            state.hub.subscribe(conn_id, destination);
        }
        ClientFrame::Unsubscribe { destination } => {
            state.hub.unsubscribe(conn_id, &destination);
        }
        ClientFrame::Join { code, client_id } => {
            // Identify before joining so the catch-up replay addressed to
            // this client is delivered.
            if let Some(id) = client_id.as_deref().map(str::trim) {
                if !id.is_empty() {
                    state.hub.identify(conn_id, ClientId::new(id));
                }
            }
            state
                .service
                .join(conn_id, code.as_deref(), client_id.as_deref());
        }
        ClientFrame::Ready => state.service.ready(conn_id),
        ClientFrame::Guess { text } => {
            state.service.guess(conn_id, text.as_deref());
        }
        ClientFrame::Draw { event } => state.service.draw(conn_id, event),
    }
}
