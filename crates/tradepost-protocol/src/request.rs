//! Inbound request vocabulary: the mode selector and the flat field map.
//!
//! The ingress hands the core a bag of `name → [values]` pairs exactly
//! as they arrived in the form body. Multiplicity is preserved on
//! purpose: a single-valued field that shows up twice is a malformed
//! request, not a value to pick from.

use std::collections::HashMap;
use std::str::FromStr;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The eight request modes of the trade protocol.
///
/// Every poll a client makes is one of these. `Connect` and `Delete`
/// are the session brackets; everything between them requires the
/// sender to already be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Register (or refresh) the sender; reply with the roster.
    Connect,
    /// Point the sender at a counterpart and ask for an exchange.
    Select,
    /// Submit the opaque payload, collect the counterpart's when ready.
    Sent,
    /// Poll for exchange readiness without re-submitting.
    Update,
    /// Confirm the exchange; also where a peer's cancel is observed.
    Valid,
    /// Abandon the exchange in progress.
    Cancel,
    /// Barrier poll: both sides reach it before animating the swap.
    Synchro,
    /// Leave the server, optionally untangling the counterpart.
    Delete,
}

impl Mode {
    /// Whether this mode requires the codes it names to already exist
    /// in the registry. Only the session brackets are exempt.
    pub fn requires_registration(self) -> bool {
        !matches!(self, Mode::Connect | Mode::Delete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Connect => "connect",
            Mode::Select => "select",
            Mode::Sent => "sent",
            Mode::Update => "update",
            Mode::Valid => "valid",
            Mode::Cancel => "cancel",
            Mode::Synchro => "synchro",
            Mode::Delete => "delete",
        }
    }
}

impl FromStr for Mode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, ProtocolError> {
        match s {
            "connect" => Ok(Mode::Connect),
            "select" => Ok(Mode::Select),
            "sent" => Ok(Mode::Sent),
            "update" => Ok(Mode::Update),
            "valid" => Ok(Mode::Valid),
            "cancel" => Ok(Mode::Cancel),
            "synchro" => Ok(Mode::Synchro),
            "delete" => Ok(Mode::Delete),
            other => Err(ProtocolError::UnknownMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// The decoded form fields of one request, multiplicity preserved.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    values: HashMap<String, Vec<String>>,
}

impl Fields {
    /// Builds the map from decoded `(name, value)` pairs, in arrival
    /// order within each name.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in pairs {
            values.entry(name).or_default().push(value);
        }
        Self { values }
    }

    /// Fetches a field that must be present exactly once.
    ///
    /// # Errors
    /// [`ProtocolError::MissingField`] when absent,
    /// [`ProtocolError::RepeatedField`] when present more than once.
    pub fn single(&self, field: &'static str) -> Result<&str, ProtocolError> {
        match self.values.get(field).map(Vec::as_slice) {
            None | Some([]) => Err(ProtocolError::MissingField { field }),
            Some([value]) => Ok(value.as_str()),
            Some(values) => Err(ProtocolError::RepeatedField {
                field,
                count: values.len(),
            }),
        }
    }

    /// Fetches a field that may be absent but must not repeat.
    ///
    /// # Errors
    /// [`ProtocolError::RepeatedField`] when present more than once.
    pub fn optional(
        &self,
        field: &'static str,
    ) -> Result<Option<&str>, ProtocolError> {
        match self.values.get(field).map(Vec::as_slice) {
            None | Some([]) => Ok(None),
            Some([value]) => Ok(Some(value.as_str())),
            Some(values) => Err(ProtocolError::RepeatedField {
                field,
                count: values.len(),
            }),
        }
    }

    /// The parsed `mode` field.
    ///
    /// # Errors
    /// Missing/repeated `mode`, or [`ProtocolError::UnknownMode`] for a
    /// value outside the table.
    pub fn mode(&self) -> Result<Mode, ProtocolError> {
        self.single("mode")?.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        Fields::from_pairs(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn test_mode_round_trips_all_eight() {
        for mode in [
            Mode::Connect,
            Mode::Select,
            Mode::Sent,
            Mode::Update,
            Mode::Valid,
            Mode::Cancel,
            Mode::Synchro,
            Mode::Delete,
        ] {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_mode_unknown_is_named_in_error() {
        let err = "gamble".parse::<Mode>().unwrap_err();
        assert_eq!(err, ProtocolError::UnknownMode("gamble".into()));
    }

    #[test]
    fn test_registration_exemptions() {
        assert!(!Mode::Connect.requires_registration());
        assert!(!Mode::Delete.requires_registration());
        assert!(Mode::Select.requires_registration());
        assert!(Mode::Synchro.requires_registration());
    }

    #[test]
    fn test_single_present_once() {
        let f = fields(&[("monCode", "1_Red")]);
        assert_eq!(f.single("monCode").unwrap(), "1_Red");
    }

    #[test]
    fn test_single_missing() {
        let f = fields(&[]);
        assert_eq!(
            f.single("monCode"),
            Err(ProtocolError::MissingField { field: "monCode" })
        );
    }

    #[test]
    fn test_single_repeated_is_an_error_not_first_wins() {
        let f = fields(&[("mode", "select"), ("mode", "cancel")]);
        assert_eq!(
            f.single("mode"),
            Err(ProtocolError::RepeatedField {
                field: "mode",
                count: 2
            })
        );
    }

    #[test]
    fn test_optional_absent_and_repeated() {
        let f = fields(&[]);
        assert_eq!(f.optional("sonCode").unwrap(), None);

        let f = fields(&[("sonCode", "1_a"), ("sonCode", "2_b")]);
        assert!(f.optional("sonCode").is_err());
    }

    #[test]
    fn test_mode_accessor_parses() {
        let f = fields(&[("mode", "synchro")]);
        assert_eq!(f.mode().unwrap(), Mode::Synchro);
    }
}
