//! Exchange configuration.

use serde::{Deserialize, Serialize};

/// Settings for the trade state machine.
///
/// The liveness/freshness timeout is not here — it belongs to the
/// registry, because eviction and freshness share one window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Reject `cancel`/`synchro` between two codes sharing the same
    /// numeric id. A client talking to itself under two names gets its
    /// record reset and an abort message instead of normal output.
    ///
    /// Off by default: ids are client-chosen, so two honest players can
    /// collide on one.
    pub forbid_self_trade: bool,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            forbid_self_trade: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_same_id() {
        assert!(!ExchangeConfig::default().forbid_self_trade);
    }
}
