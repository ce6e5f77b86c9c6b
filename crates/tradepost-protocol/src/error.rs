//! Error types for the protocol layer.
//!
//! Every variant is non-fatal: a request that trips one is answered with
//! the error's message as the plain-text body and the server moves on.
//! Nothing here ever mutates a player — validation runs to completion
//! before any handler touches the registry.

/// Why a raw code string failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    /// No `_` separator between id and name.
    #[error("no '_' separator")]
    MissingSeparator,

    /// The id part contains something other than decimal digits.
    #[error("id is not a number")]
    IdNotNumeric,

    /// The name part is empty or strays outside `[A-Za-z0-9_$-]`.
    #[error("name contains forbidden characters")]
    NameForbidden,
}

/// Errors a request can trip before reaching a mode handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// A required field was absent.
    #[error("invalid request: field '{field}' is missing")]
    MissingField { field: &'static str },

    /// A single-valued field appeared more than once. Never collapsed
    /// to the first value.
    #[error("invalid request: field '{field}' appears {count} times")]
    RepeatedField { field: &'static str, count: usize },

    /// A code field failed format validation.
    #[error("invalid request: '{code}' is not a valid trade code for '{field}' ({reason})")]
    InvalidCode {
        field: &'static str,
        code: String,
        reason: CodeError,
    },

    /// A well-formed code named a player the registry does not know,
    /// in a mode that requires an existing entry.
    #[error("invalid request: '{code}' given for '{field}' is not a connected player")]
    UnknownPlayer {
        field: &'static str,
        code: String,
    },

    /// The mode value matched none of the eight known modes.
    #[error("invalid request: mode '{0}' is not recognized")]
    UnknownMode(String),
}
