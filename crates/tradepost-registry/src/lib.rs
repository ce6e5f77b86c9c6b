//! Player registry for tradepost.
//!
//! Owns every [`Player`] record for the life of its session:
//!
//! - created on the first `connect` for an unseen code,
//! - liveness-refreshed on every request bearing that code,
//! - evicted by [`Registry::prune`] once silent for longer than the
//!   shared timeout, or removed explicitly by `delete`.
//!
//! No other component keeps a `Player` past the scope of one request;
//! the `friend` pointer between players is a code string re-resolved
//! here on each use.

mod player;
mod registry;

pub use player::{Player, Token};
pub use registry::Registry;
