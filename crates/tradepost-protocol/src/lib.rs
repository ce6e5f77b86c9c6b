//! Wire vocabulary for tradepost.
//!
//! This crate defines what travels between a polling client and the
//! trade server:
//!
//! - **Codes** ([`TradeCode`]) — the `<id>_<name>` identifier a client
//!   picks for itself, parsed and validated once.
//! - **Requests** ([`Fields`], [`Mode`]) — the flat field map of one
//!   poll and the eight-way mode selector.
//! - **Replies** ([`Reply`]) — the plain-text bodies clients switch on.
//! - **Errors** ([`ProtocolError`], [`CodeError`]) — everything a
//!   request can trip before a handler runs.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about HTTP, players, or time. It
//! sits between the ingress (raw form pairs) and the exchange logic
//! (registered players):
//!
//! ```text
//! Ingress (form pairs) → Protocol (Fields/Mode) → Exchange (Reply)
//! ```

mod code;
mod error;
mod reply;
mod request;

pub use code::TradeCode;
pub use error::{CodeError, ProtocolError};
pub use reply::Reply;
pub use request::{Fields, Mode};
