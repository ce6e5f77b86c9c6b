//! The trade state machine: one handler per mode.
//!
//! No trade state is stored anywhere. Each request re-derives where a
//! pair stands from the counterpart's timestamp tokens and friend
//! pointer, checked against the shared freshness window. A lost or
//! late poll never wedges anything — the next poll inside the window
//! picks the handshake back up, and the reply `""` simply means
//! "not ready, keep polling".
//!
//! Every handler validates all of its fields before touching the
//! registry; a rejected request leaves no player half-mutated.

use std::time::Instant;

use tradepost_protocol::{Fields, Mode, ProtocolError, Reply, TradeCode};
use tradepost_registry::{Player, Registry};

use crate::ExchangeConfig;

/// The per-request decision logic. Stateless apart from its config;
/// all mutable state lives in the [`Registry`] the caller locks.
#[derive(Debug, Clone, Default)]
pub struct Exchange {
    config: ExchangeConfig,
}

impl Exchange {
    pub fn new(config: ExchangeConfig) -> Self {
        Self { config }
    }

    /// Processes one inbound request against the registry.
    ///
    /// Prunes stale players first (every request does, whatever its
    /// mode), then dispatches on `mode`. The caller holds the registry
    /// lock for the whole call.
    ///
    /// # Errors
    /// Any [`ProtocolError`]; the ingress surfaces its message as the
    /// plain-text body.
    pub fn handle(
        &self,
        registry: &mut Registry,
        fields: &Fields,
        now: Instant,
    ) -> Result<Reply, ProtocolError> {
        registry.prune(now);

        let mode = fields.mode()?;
        tracing::debug!(%mode, "trade request");

        match mode {
            Mode::Connect => self.connect(registry, fields, now),
            Mode::Select => self.select(registry, fields, now),
            Mode::Sent => self.sent(registry, fields, now),
            Mode::Update => self.update(registry, fields, now),
            Mode::Valid => self.valid(registry, fields, now),
            Mode::Cancel => self.cancel(registry, fields, now),
            Mode::Synchro => self.synchro(registry, fields, now),
            Mode::Delete => self.delete(registry, fields),
        }
    }

    /// `connect` — register or refresh the sender, reply with the
    /// roster of everyone currently connected.
    fn connect(
        &self,
        registry: &mut Registry,
        fields: &Fields,
        now: Instant,
    ) -> Result<Reply, ProtocolError> {
        let mon = resolve(fields, "monCode", Mode::Connect, registry)?;
        registry.get_or_create(&mon, now);
        Ok(Reply::Roster(registry.codes()))
    }

    /// `select` — target a counterpart and ask for an exchange.
    /// Agreement is mutual selection: the reply is `"true"` only once
    /// the counterpart has targeted the sender back, recently enough.
    fn select(
        &self,
        registry: &mut Registry,
        fields: &Fields,
        now: Instant,
    ) -> Result<Reply, ProtocolError> {
        let mon = resolve(fields, "monCode", Mode::Select, registry)?;
        let son = resolve(fields, "sonCode", Mode::Select, registry)?;

        let p1 = sender(registry, &mon);
        p1.seen(now);
        p1.exchange.stamp(now);
        p1.friend = Some(son.as_str().to_string());

        let p2 = counterpart(registry, &son);
        if registry.is_fresh(p2.exchange, now) && p2.is_friend(&mon) {
            tracing::info!(player = %mon, counterpart = %son, "exchange agreed");
            Ok(Reply::Accepted)
        } else {
            tracing::debug!(player = %mon, counterpart = %son, "awaiting counterpart");
            Ok(Reply::Empty)
        }
    }

    /// `sent` — submit the opaque payload; collect the counterpart's
    /// once both sides have an artifact in and the counterpart still
    /// points here within the window.
    fn sent(
        &self,
        registry: &mut Registry,
        fields: &Fields,
        now: Instant,
    ) -> Result<Reply, ProtocolError> {
        let mon = resolve(fields, "monCode", Mode::Sent, registry)?;
        let son = resolve(fields, "sonCode", Mode::Sent, registry)?;
        let payload = fields.single("payload")?.to_string();

        let p1 = sender(registry, &mon);
        p1.seen(now);
        p1.payload = payload;
        p1.exchange.stamp(now);
        let own_ready = !p1.payload.is_empty();
        tracing::info!(player = %mon, "payload submitted");

        let p2 = counterpart(registry, &son);
        if own_ready && registry.is_fresh(p2.exchange, now) && p2.is_friend(&mon) {
            tracing::debug!(player = %mon, counterpart = %son, "handing over payload");
            Ok(Reply::Payload(p2.payload.clone()))
        } else {
            tracing::debug!(player = %mon, counterpart = %son, "awaiting payload");
            Ok(Reply::Empty)
        }
    }

    /// `update` — poll for readiness without re-submitting. The reply
    /// echoes the sender's own stored artifact once the counterpart's
    /// side is in; the counterpart's copy travels on its own `sent`
    /// polls.
    fn update(
        &self,
        registry: &mut Registry,
        fields: &Fields,
        now: Instant,
    ) -> Result<Reply, ProtocolError> {
        let mon = resolve(fields, "monCode", Mode::Update, registry)?;
        let son = resolve(fields, "sonCode", Mode::Update, registry)?;

        let p1 = sender(registry, &mon);
        p1.seen(now);
        p1.exchange.stamp(now);
        let own_payload = p1.payload.clone();

        let p2 = counterpart(registry, &son);
        if !p2.payload.is_empty()
            && registry.is_fresh(p2.exchange, now)
            && p2.is_friend(&mon)
        {
            Ok(Reply::Payload(own_payload))
        } else {
            tracing::debug!(player = %mon, counterpart = %son, "awaiting payload");
            Ok(Reply::Empty)
        }
    }

    /// `valid` — confirm the exchange. A counterpart cancel stamped
    /// after its last exchange action wins over everything and answers
    /// `"false"`; a fresh counterpart confirm answers `"true"`.
    fn valid(
        &self,
        registry: &mut Registry,
        fields: &Fields,
        now: Instant,
    ) -> Result<Reply, ProtocolError> {
        let mon = resolve(fields, "monCode", Mode::Valid, registry)?;
        let son = resolve(fields, "sonCode", Mode::Valid, registry)?;

        let p1 = sender(registry, &mon);
        p1.seen(now);
        p1.confirm.stamp(now);

        let p2 = counterpart(registry, &son);
        if p2.cancel.is_after(p2.exchange) && p2.is_friend(&mon) {
            tracing::info!(player = %mon, counterpart = %son, "exchange called off");
            Ok(Reply::Denied)
        } else if registry.is_fresh(p2.confirm, now) && p2.is_friend(&mon) {
            tracing::info!(player = %mon, counterpart = %son, "exchange confirmed");
            Ok(Reply::Accepted)
        } else {
            Ok(Reply::Empty)
        }
    }

    /// `cancel` — abandon the exchange. Always acknowledged; the
    /// counterpart discovers it on its next `valid` poll.
    fn cancel(
        &self,
        registry: &mut Registry,
        fields: &Fields,
        now: Instant,
    ) -> Result<Reply, ProtocolError> {
        let mon = resolve(fields, "monCode", Mode::Cancel, registry)?;
        let son = resolve(fields, "sonCode", Mode::Cancel, registry)?;

        if let Some(reply) = self.same_origin_guard(registry, &mon, &son) {
            return Ok(reply);
        }

        let p1 = sender(registry, &mon);
        p1.seen(now);
        p1.cancel.stamp(now);
        tracing::info!(player = %mon, "exchange cancelled");

        Ok(Reply::Accepted)
    }

    /// `synchro` — barrier poll before the swap animation: `"true"`
    /// only while the counterpart's own synchro stamp is fresh.
    fn synchro(
        &self,
        registry: &mut Registry,
        fields: &Fields,
        now: Instant,
    ) -> Result<Reply, ProtocolError> {
        let mon = resolve(fields, "monCode", Mode::Synchro, registry)?;
        let son = resolve(fields, "sonCode", Mode::Synchro, registry)?;

        if let Some(reply) = self.same_origin_guard(registry, &mon, &son) {
            return Ok(reply);
        }

        let p1 = sender(registry, &mon);
        p1.seen(now);
        p1.sync.stamp(now);

        let p2 = counterpart(registry, &son);
        if registry.is_fresh(p2.sync, now) {
            Ok(Reply::Accepted)
        } else {
            Ok(Reply::Empty)
        }
    }

    /// `delete` — leave the server. If a counterpart is named and still
    /// points at the sender, its record is reset so it does not keep
    /// waiting on a ghost. Tolerant of either entry already being gone.
    fn delete(
        &self,
        registry: &mut Registry,
        fields: &Fields,
    ) -> Result<Reply, ProtocolError> {
        let mon = resolve(fields, "monCode", Mode::Delete, registry)?;
        let son = match fields.optional("sonCode")? {
            Some(raw) => Some(parse_code(raw, "sonCode")?),
            None => None,
        };

        if let Some(son) = son {
            if let Some(p2) = registry.get_mut(son.as_str()) {
                if p2.is_friend(&mon) {
                    tracing::debug!(counterpart = %son, "releasing counterpart");
                    p2.reset();
                }
            }
        }

        registry.remove(mon.as_str());
        Ok(Reply::Empty)
    }

    /// The same-origin guard shared by `cancel` and `synchro`. When
    /// enabled and both codes carry one numeric id, the initiator is
    /// fully reset and told off; returns the reply to short-circuit
    /// with, or `None` to proceed normally.
    fn same_origin_guard(
        &self,
        registry: &mut Registry,
        mon: &TradeCode,
        son: &TradeCode,
    ) -> Option<Reply> {
        if !self.config.forbid_self_trade || !mon.same_origin(son) {
            return None;
        }
        tracing::warn!(player = %mon, "self trade rejected");
        sender(registry, mon).reset();
        Some(Reply::SelfTradeRejected)
    }
}

/// Parses one raw code, attaching the field name to any failure.
fn parse_code(
    raw: &str,
    field: &'static str,
) -> Result<TradeCode, ProtocolError> {
    TradeCode::parse(raw).map_err(|reason| ProtocolError::InvalidCode {
        field,
        code: raw.to_string(),
        reason,
    })
}

/// Extracts and validates a code field: format always, registration
/// except in the session-bracket modes.
fn resolve(
    fields: &Fields,
    field: &'static str,
    mode: Mode,
    registry: &Registry,
) -> Result<TradeCode, ProtocolError> {
    let code = parse_code(fields.single(field)?, field)?;
    if mode.requires_registration() && !registry.contains(code.as_str()) {
        return Err(ProtocolError::UnknownPlayer {
            field,
            code: code.as_str().to_string(),
        });
    }
    Ok(code)
}

/// Fetches a player both `resolve`d and untouched since — the registry
/// lock is held for the whole request, so the entry cannot have moved.
fn sender<'r>(registry: &'r mut Registry, code: &TradeCode) -> &'r mut Player {
    registry
        .get_mut(code.as_str())
        .expect("validated against the registry this request")
}

fn counterpart<'r>(registry: &'r Registry, code: &TradeCode) -> &'r Player {
    registry
        .get(code.as_str())
        .expect("validated against the registry this request")
}
