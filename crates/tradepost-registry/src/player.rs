//! Player state: one record per connected client.
//!
//! A player is nothing but evidence of its own polling. Four timestamp
//! tokens record the most recent action of each kind; every protocol
//! decision is re-derived from those tokens against the freshness
//! window. No explicit trade state is ever stored:
//!
//! ```text
//! Idle → ExchangeRequested → Matched → PayloadSent → Confirming
//!      → (Cancelled | Synced) → Done
//! ```
//!
//! is how a pair progresses logically, but the server only ever sees
//! "token t was stamped at time x" and asks "is that still fresh?".

use std::time::{Duration, Instant};

use tradepost_protocol::TradeCode;

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A timestamp token: the time of the most recent action of one kind,
/// or unset ("never").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token(Option<Instant>);

impl Token {
    /// Stamps the token with the current request time.
    pub fn stamp(&mut self, now: Instant) {
        self.0 = Some(now);
    }

    /// Returns the token to "never".
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Whether the token has ever been stamped.
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Whether the token is still valid evidence of counterpart intent.
    ///
    /// Strict window: a token whose age equals the timeout exactly is
    /// already stale.
    pub fn is_fresh(&self, now: Instant, timeout: Duration) -> bool {
        match self.0 {
            Some(stamped) => now.duration_since(stamped) < timeout,
            None => false,
        }
    }

    /// Whether this token was stamped after `other`. An unset token is
    /// after nothing; anything set is after an unset token.
    pub fn is_after(&self, other: Token) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a > b,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Time since the stamp, for the admin page. `None` when unset.
    pub fn age(&self, now: Instant) -> Option<Duration> {
        self.0.map(|stamped| now.duration_since(stamped))
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One connected client's record, keyed in the registry by its full
/// code string.
#[derive(Debug, Clone)]
pub struct Player {
    code: TradeCode,
    last_seen: Instant,

    /// The most recent artifact this player submitted via `sent`;
    /// empty until then. Carried opaquely — the server never looks
    /// inside.
    pub payload: String,

    /// Full code of the counterpart this player targeted with
    /// `select`, or unset. A weak reference: resolved against the
    /// registry on every use, and the target having vanished is a
    /// normal outcome.
    pub friend: Option<String>,

    /// Stamped by `select`, `sent`, and `update`.
    pub exchange: Token,
    /// Stamped by `valid`.
    pub confirm: Token,
    /// Stamped by `cancel`.
    pub cancel: Token,
    /// Stamped by `synchro`.
    pub sync: Token,
}

impl Player {
    /// Creates a fresh record for a code first seen at `now`.
    pub fn new(code: TradeCode, now: Instant) -> Self {
        Self {
            code,
            last_seen: now,
            payload: String::new(),
            friend: None,
            exchange: Token::default(),
            confirm: Token::default(),
            cancel: Token::default(),
            sync: Token::default(),
        }
    }

    /// The code this player connected under. Immutable for the life of
    /// the entry.
    pub fn code(&self) -> &TradeCode {
        &self.code
    }

    /// Records a request from this player, deferring eviction.
    pub fn seen(&mut self, now: Instant) {
        self.last_seen = now;
    }

    /// Whether the player has gone silent for longer than the timeout
    /// (strictly longer — an age of exactly the timeout survives one
    /// more prune).
    pub fn is_expired(&self, now: Instant, timeout: Duration) -> bool {
        now.duration_since(self.last_seen) > timeout
    }

    /// Time since the last request, for the admin page.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.duration_since(self.last_seen)
    }

    /// Whether this player currently targets `code` as its counterpart.
    pub fn is_friend(&self, code: &TradeCode) -> bool {
        self.friend.as_deref() == Some(code.as_str())
    }

    /// Clears payload, friend, and all four tokens as a unit. There is
    /// no partial reset anywhere in the protocol.
    pub fn reset(&mut self) {
        self.payload.clear();
        self.friend = None;
        self.exchange.clear();
        self.confirm.clear();
        self.cancel.clear();
        self.sync.clear();
    }
}
