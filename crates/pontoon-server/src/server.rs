//! `PontoonServer` builder and accept loop.
//!
//! This is the entry point for running a duel server. It binds the
//! listener, owns the shared state, and spawns one handler task per
//! accepted connection.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use pontoon_game::DuelConfig;
use pontoon_protocol::JsonCodec;
use pontoon_room::RoomRegistry;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::ServerError;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks.
/// Interior mutability via `Mutex` where needed.
pub(crate) struct ServerState {
    pub(crate) registry: Mutex<RoomRegistry>,
    pub(crate) next_player_id: AtomicU64,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Pontoon server.
///
/// # Example
///
/// ```rust,ignore
/// let server = PontoonServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct PontoonServerBuilder {
    bind_addr: String,
    duel_config: DuelConfig,
}

impl PontoonServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            duel_config: DuelConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the duel rules handed to every room.
    pub fn duel_config(mut self, config: DuelConfig) -> Self {
        self.duel_config = config;
        self
    }

    /// Binds the listener and builds the server.
    pub async fn build(self) -> Result<PontoonServer, ServerError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "listening");

        let state = Arc::new(ServerState {
            registry: Mutex::new(RoomRegistry::new(self.duel_config)),
            next_player_id: AtomicU64::new(1),
            codec: JsonCodec,
        });

        Ok(PontoonServer { listener, state })
    }
}

impl Default for PontoonServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Pontoon duel server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct PontoonServer {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl PontoonServer {
    /// Creates a new builder.
    pub fn builder() -> PontoonServerBuilder {
        PontoonServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("pontoon server running");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(stream, addr, state).await
                        {
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
