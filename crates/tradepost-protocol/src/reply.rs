//! Replies: what the core hands back to the ingress.
//!
//! The whole protocol answers in plain text. Clients poll and switch on
//! a handful of literal bodies — `"true"`, `"false"`, the empty string —
//! or take the body verbatim as the counterpart's payload. Keeping the
//! variants symbolic here means handlers never concatenate raw strings
//! and the ingress renders in exactly one place.

use std::fmt;

/// One plain-text answer to one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `"true"` — the condition the mode was probing holds.
    Accepted,

    /// `"false"` — the counterpart cancelled; stop confirming.
    Denied,

    /// `""` — not ready yet (or nothing to say). The client's own poll
    /// loop carries the retry; the server never waits.
    Empty,

    /// The opaque payload string, delivered verbatim.
    Payload(String),

    /// The roster of connected codes, rendered as a JSON string array.
    Roster(Vec<String>),

    /// The same-origin guard fired: the initiator was reset and told why.
    SelfTradeRejected,
}

impl Reply {
    /// Renders the reply to the exact body the client will see.
    pub fn into_body(self) -> String {
        match self {
            Reply::Accepted => "true".to_string(),
            Reply::Denied => "false".to_string(),
            Reply::Empty => String::new(),
            Reply::Payload(payload) => payload,
            Reply::Roster(codes) => serde_json::to_string(&codes)
                .expect("a string array always serializes"),
            Reply::SelfTradeRejected => "self trade forbidden".to_string(),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clone().into_body())
    }
}
