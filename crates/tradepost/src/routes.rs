//! Request handlers: the POST trade endpoint and the GET status page.
//!
//! Both prune the registry before anything else, and both hold the
//! registry lock for their whole critical section. Decoded form and
//! query pairs keep their multiplicity — collapsing duplicates here
//! would hide malformed requests from the core.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Form, Query, State};
use axum::response::Html;
use tradepost_protocol::Fields;

use crate::page;
use crate::server::ServerState;

/// POST `/` — one poll of the trade protocol. The reply body is plain
/// text; validation failures answer with the error's message and a
/// warn log, never a dead connection.
pub(crate) async fn trade(
    State(state): State<Arc<ServerState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> String {
    let fields = Fields::from_pairs(pairs);
    let now = Instant::now();

    let mut registry = state.registry.lock().await;
    match state.exchange.handle(&mut registry, &fields, now) {
        Ok(reply) => {
            let body = reply.into_body();
            tracing::debug!(reply = %body, "answering poll");
            body
        }
        Err(err) => {
            tracing::warn!(error = %err, "rejected request");
            err.to_string()
        }
    }
}

/// GET `/` — the status page. With `?mode=admin&code=<secret>` and the
/// right secret, the table adds liveness and token ages; a wrong
/// secret logs the attempt and falls back to the public view.
pub(crate) async fn status(
    State(state): State<Arc<ServerState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Html<String> {
    let fields = Fields::from_pairs(pairs);
    let now = Instant::now();

    let admin = match fields.optional("mode") {
        Ok(Some("admin")) => match fields.optional("code") {
            Ok(Some(code)) if code == state.admin_secret => {
                tracing::info!("admin page viewed");
                true
            }
            _ => {
                tracing::warn!("failed attempt at the admin page");
                false
            }
        },
        _ => false,
    };

    let mut registry = state.registry.lock().await;
    registry.prune(now);
    Html(page::render(&registry, now, admin))
}
