//! `TradeServer` builder and server loop.
//!
//! Ties the layers together: axum ingress → exchange logic → registry.
//! The registry sits behind one async mutex; a request holds the guard
//! for its entire registry access, which is exactly the scheduling
//! granularity the protocol assumes.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use rand::Rng;
use tokio::sync::Mutex;
use tradepost_exchange::{Exchange, ExchangeConfig};
use tradepost_registry::Registry;

use crate::routes;
use crate::ServerError;

/// Shared server state handed to each request handler.
pub(crate) struct ServerState {
    pub(crate) registry: Mutex<Registry>,
    pub(crate) exchange: Exchange,
    pub(crate) admin_secret: String,
}

/// Builder for configuring and starting a trade server.
///
/// # Example
///
/// ```rust,no_run
/// use tradepost::TradeServer;
///
/// # async fn run() -> Result<(), tradepost::ServerError> {
/// let server = TradeServer::builder()
///     .bind("0.0.0.0:80")
///     .timeout_secs(60)
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct TradeServerBuilder {
    bind_addr: String,
    timeout: Duration,
    exchange: ExchangeConfig,
    admin_secret: Option<String>,
}

impl TradeServerBuilder {
    /// Creates a builder with default settings: local bind, one-minute
    /// liveness window, self-trading tolerated, random admin secret.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            timeout: Duration::from_secs(60),
            exchange: ExchangeConfig::default(),
            admin_secret: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the liveness timeout, shared by eviction and every
    /// freshness check.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Toggles the same-origin guard on `cancel`/`synchro`.
    pub fn forbid_self_trade(mut self, forbid: bool) -> Self {
        self.exchange.forbid_self_trade = forbid;
        self
    }

    /// Fixes the admin secret instead of generating one at startup.
    pub fn admin_secret(mut self, secret: impl Into<String>) -> Self {
        self.admin_secret = Some(secret.into());
        self
    }

    /// Builds the router without binding — the trade endpoint and the
    /// status page, at `/` and at `/index.php` (where the original
    /// game clients expect it).
    pub fn into_router(self) -> Router {
        let admin_secret = self
            .admin_secret
            .unwrap_or_else(generate_admin_secret);
        tracing::info!(%admin_secret, "admin secret for the status page");

        let state = Arc::new(ServerState {
            registry: Mutex::new(Registry::new(self.timeout)),
            exchange: Exchange::new(self.exchange),
            admin_secret,
        });

        Router::new()
            .route("/", get(routes::status).post(routes::trade))
            .route("/index.php", get(routes::status).post(routes::trade))
            .with_state(state)
    }

    /// Binds the listen socket and returns a runnable server.
    ///
    /// # Errors
    /// [`ServerError::Io`] when the bind fails — the one fatal
    /// condition in this crate.
    pub async fn build(self) -> Result<TradeServer, ServerError> {
        let bind_addr = self.bind_addr.clone();
        let router = self.into_router();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
        Ok(TradeServer { listener, router })
    }
}

impl Default for TradeServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound, ready-to-run trade server.
pub struct TradeServer {
    listener: tokio::net::TcpListener,
    router: Router,
}

impl TradeServer {
    /// Creates a new builder.
    pub fn builder() -> TradeServerBuilder {
        TradeServerBuilder::new()
    }

    /// The local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until the process is terminated.
    pub async fn run(self) -> Result<(), ServerError> {
        if let Ok(addr) = self.local_addr() {
            tracing::info!(%addr, "trade server running");
        }
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }
}

/// A fresh 64-bit hex secret for the admin page, logged once at
/// startup so the operator can read it back.
fn generate_admin_secret() -> String {
    let bits: u64 = rand::rng().random();
    format!("{bits:016x}")
}
