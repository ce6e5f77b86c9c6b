//! # tradepost
//!
//! A polling trade rendezvous server. Two clients, each polling over
//! plain HTTP at their own pace, exchange an opaque payload through a
//! shared registry — no direct connection, no push channel, no state
//! that survives a restart. Progress is derived entirely from
//! timestamp freshness; see `tradepost-exchange` for the protocol
//! logic.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tradepost::TradeServer;
//!
//! # async fn run() -> Result<(), tradepost::ServerError> {
//! let server = TradeServer::builder()
//!     .bind("0.0.0.0:80")
//!     .timeout_secs(60)
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod page;
mod routes;
mod server;

pub use error::ServerError;
pub use server::{TradeServer, TradeServerBuilder};
