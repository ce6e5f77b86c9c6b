//! The player registry: every connected client, continuously pruned.
//!
//! # Concurrency note
//!
//! `Registry` is NOT thread-safe by itself — it is a plain `HashMap`
//! owned by the server and locked as a whole for the duration of each
//! request's access. That whole-request critical section is the
//! protocol's scheduling granularity: two polls never interleave
//! reads and writes on the same player.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tradepost_protocol::TradeCode;

use crate::{Player, Token};

/// Mapping from full code string to [`Player`], plus the single shared
/// timeout applied to both liveness eviction and every freshness check.
#[derive(Debug)]
pub struct Registry {
    players: HashMap<String, Player>,
    timeout: Duration,
}

impl Registry {
    /// Creates an empty registry with the given liveness timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            players: HashMap::new(),
            timeout,
        }
    }

    /// The shared staleness window.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a token is fresh under this registry's window.
    pub fn is_fresh(&self, token: Token, now: Instant) -> bool {
        token.is_fresh(now, self.timeout)
    }

    /// Evicts every player silent for longer than the timeout.
    ///
    /// Called at the start of every inbound request, whatever the mode.
    /// Idempotent; O(n) in connected players.
    pub fn prune(&mut self, now: Instant) {
        let timeout = self.timeout;
        self.players.retain(|_, player| {
            if player.is_expired(now, timeout) {
                tracing::warn!(player = %player.code(), "liveness timeout, evicting");
                false
            } else {
                true
            }
        });
    }

    /// Returns the existing entry for `code`, refreshing its liveness,
    /// or creates one. Creation is the only path that derives id/name.
    pub fn get_or_create(&mut self, code: &TradeCode, now: Instant) -> &mut Player {
        let entry = self
            .players
            .entry(code.as_str().to_string())
            .or_insert_with(|| {
                tracing::info!(player = %code, "connected");
                Player::new(code.clone(), now)
            });
        entry.seen(now);
        entry
    }

    pub fn get(&self, code: &str) -> Option<&Player> {
        self.players.get(code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Player> {
        self.players.get_mut(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.players.contains_key(code)
    }

    /// Removes an entry. Missing codes are a no-op — the player may
    /// have been pruned a moment earlier.
    pub fn remove(&mut self, code: &str) -> Option<Player> {
        let removed = self.players.remove(code);
        if let Some(player) = &removed {
            tracing::info!(player = %player.code(), "disconnected");
        }
        removed
    }

    /// The connected codes, sorted for a deterministic roster.
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.players.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// All player records, for the status page.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(60);

    fn code(raw: &str) -> TradeCode {
        raw.parse().unwrap()
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let t0 = Instant::now();
        let mut reg = Registry::new(TIMEOUT);

        reg.get_or_create(&code("1_Red"), t0);
        reg.get_or_create(&code("1_Red"), t0 + Duration::from_secs(5));

        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_get_or_create_refreshes_liveness() {
        let t0 = Instant::now();
        let mut reg = Registry::new(TIMEOUT);

        reg.get_or_create(&code("1_Red"), t0);
        // Second connect just inside the window defers eviction.
        reg.get_or_create(&code("1_Red"), t0 + Duration::from_secs(59));

        reg.prune(t0 + Duration::from_secs(100));
        assert!(reg.contains("1_Red"));
    }

    #[test]
    fn test_prune_evicts_only_the_silent() {
        let t0 = Instant::now();
        let mut reg = Registry::new(TIMEOUT);

        reg.get_or_create(&code("1_Red"), t0);
        reg.get_or_create(&code("2_Blue"), t0 + Duration::from_secs(30));

        reg.prune(t0 + Duration::from_secs(61));

        assert!(!reg.contains("1_Red"));
        assert!(reg.contains("2_Blue"));
    }

    #[test]
    fn test_prune_boundary_exactly_timeout_survives() {
        // Eviction requires strictly more than the timeout.
        let t0 = Instant::now();
        let mut reg = Registry::new(TIMEOUT);
        reg.get_or_create(&code("1_Red"), t0);

        reg.prune(t0 + TIMEOUT);
        assert!(reg.contains("1_Red"));

        reg.prune(t0 + TIMEOUT + Duration::from_millis(1));
        assert!(!reg.contains("1_Red"));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut reg = Registry::new(TIMEOUT);
        assert!(reg.remove("9_Ghost").is_none());
    }

    #[test]
    fn test_codes_are_sorted() {
        let t0 = Instant::now();
        let mut reg = Registry::new(TIMEOUT);
        reg.get_or_create(&code("2_Blue"), t0);
        reg.get_or_create(&code("1_Red"), t0);
        reg.get_or_create(&code("10_Green"), t0);

        assert_eq!(reg.codes(), vec!["10_Green", "1_Red", "2_Blue"]);
    }
}
