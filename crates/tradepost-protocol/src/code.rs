//! Trade codes: the client-supplied identifier naming a player.
//!
//! A code has the shape `<id>_<name>` — a numeric id, one underscore,
//! then a display name. The id carries no server-side meaning beyond the
//! same-origin check; the full code string is what keys the registry.

use std::fmt;
use std::str::FromStr;

use crate::CodeError;

/// A parsed, validated player code.
///
/// Splitting happens at the FIRST underscore, so the name itself may
/// contain further underscores: `12_team_rocket` parses to id `12`,
/// name `team_rocket`.
///
/// `id` and `name` are derived exactly once, at parse time; a code never
/// changes after that.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TradeCode {
    raw: String,
    id: String,
    name: String,
}

impl TradeCode {
    /// Parses and validates a raw code string.
    ///
    /// Rules:
    /// - must contain a `_` separator;
    /// - the id part must be one or more decimal digits;
    /// - the name part must be non-empty and drawn from
    ///   `[A-Za-z0-9_$-]` — alphanumerics and specials may mix freely.
    ///
    /// # Errors
    /// Returns the specific [`CodeError`] for the first rule violated.
    pub fn parse(raw: &str) -> Result<Self, CodeError> {
        let (id, name) = raw
            .split_once('_')
            .ok_or(CodeError::MissingSeparator)?;

        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CodeError::IdNotNumeric);
        }

        if name.is_empty() || !name.chars().all(is_name_char) {
            return Err(CodeError::NameForbidden);
        }

        Ok(Self {
            raw: raw.to_string(),
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    /// The full code string, exactly as the client sent it.
    /// This is the registry key.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The numeric id portion (kept as digits — only ever compared,
    /// never computed with).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display-name portion.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether two codes share the same numeric id. The same-origin
    /// guard treats that as one client talking to itself.
    pub fn same_origin(&self, other: &TradeCode) -> bool {
        self.id == other.id
    }
}

impl FromStr for TradeCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, CodeError> {
        Self::parse(s)
    }
}

/// Renders as `name (id)` — the form the server logs use.
impl fmt::Display for TradeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '-')
}
