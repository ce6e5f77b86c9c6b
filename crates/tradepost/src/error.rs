//! Unified error type for the tradepost server crate.

use tradepost_protocol::ProtocolError;

/// Top-level error for the server crate.
///
/// Protocol errors never take the server down — the ingress answers
/// them as plain text and moves on. The variant exists for callers
/// driving the core through this crate's re-exports. The only path
/// that actually aborts the process is I/O: failing to bind or serve
/// the listen socket.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A request-level protocol failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Socket-level failure (bind, accept, serve).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
