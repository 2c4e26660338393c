//! `DoodleServer` builder and accept loop.
//!
//! This is the entry point for running a Doodle server. It ties the layers
//! together: transport → protocol → hub → game service → rooms.

use std::sync::Arc;

use doodle_protocol::JsonCodec;
use doodle_room::RoomConfig;
use doodle_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{DoodleError, GameService, TopicHub};

/// Address used when none is configured.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) hub: Arc<TopicHub>,
    pub(crate) service: GameService<Arc<TopicHub>>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Doodle server.
///
/// # Example
///
/// ```rust,no_run
/// use doodle::prelude::*;
///
/// # async fn start() -> Result<(), DoodleError> {
/// let server = DoodleServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct DoodleServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl DoodleServerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: DEFAULT_ADDR.to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the word list and system identity used by every room.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener and builds the server.
    ///
    /// # Errors
    /// Fails if the address can't be bound or the room configuration has
    /// no usable word.
    pub async fn build(self) -> Result<DoodleServer, DoodleError> {
        let hub = Arc::new(TopicHub::new());
        let service = GameService::new(&self.room_config, Arc::clone(&hub))?;
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            hub,
            service,
            codec: JsonCodec,
        });
        Ok(DoodleServer { transport, state })
    }
}

impl Default for DoodleServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A Doodle server bound to its address.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DoodleServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl DoodleServer {
    /// Creates a new builder.
    pub fn builder() -> DoodleServerBuilder {
        DoodleServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop.
    ///
    /// Spawns one handler task per accepted connection. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), DoodleError> {
        match self.local_addr() {
            Ok(addr) => tracing::info!(%addr, "Doodle server running"),
            Err(_) => tracing::info!("Doodle server running"),
        }

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
