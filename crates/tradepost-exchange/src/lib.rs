//! Trade state machine for tradepost.
//!
//! The decision logic of the handshake protocol: eight request modes,
//! each re-deriving where a pair of players stands from timestamp
//! tokens instead of stored state. See [`Exchange::handle`].
//!
//! # Key types
//!
//! - [`Exchange`] — the per-request handler
//! - [`ExchangeConfig`] — same-origin guard toggle

mod config;
mod machine;

pub use config::ExchangeConfig;
pub use machine::Exchange;
