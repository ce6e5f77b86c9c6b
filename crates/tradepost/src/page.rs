//! The HTML status page.
//!
//! Codes are restricted to `[A-Za-z0-9_$-]` by validation, so player
//! data can be interpolated into the markup as-is.

use std::fmt::Write;
use std::time::{Duration, Instant};

use tradepost_registry::{Player, Registry, Token};

/// Renders the status page; `admin` adds the liveness and token
/// columns.
pub(crate) fn render(registry: &Registry, now: Instant, admin: bool) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n  <head>\n");
    if admin {
        html.push_str("    <title>Trade server admin</title>\n");
    } else {
        html.push_str("    <title>Trade server</title>\n");
    }
    html.push_str("  </head>\n  <body>\n    <center>\n");
    html.push_str("      <h1>The trade server is running</h1>\n");

    if registry.is_empty() {
        html.push_str("      <p>No players connected</p>\n");
    } else {
        html.push_str("      <table>\n");
        html.push_str("        <caption>Connected players</caption>\n");
        html.push_str("        <tr>\n          <th>Player</th>\n");
        if admin {
            for column in ["Seen", "Friend", "Exchange", "Confirm", "Cancel", "Sync"] {
                let _ = writeln!(html, "          <th>{column}</th>");
            }
        }
        html.push_str("        </tr>\n");

        let mut players: Vec<&Player> = registry.players().collect();
        players.sort_by(|a, b| a.code().as_str().cmp(b.code().as_str()));
        for player in players {
            render_row(&mut html, player, now, admin);
        }
        html.push_str("      </table>\n");
    }

    html.push_str("    </center>\n  </body>\n</html>\n");
    html
}

fn render_row(html: &mut String, player: &Player, now: Instant, admin: bool) {
    html.push_str("        <tr>\n");
    let _ = writeln!(html, "          <td>{}</td>", player.code());
    if admin {
        let _ = writeln!(
            html,
            "          <td>{}</td>",
            fmt_duration(player.idle_for(now))
        );
        let _ = writeln!(
            html,
            "          <td>{}</td>",
            player.friend.as_deref().unwrap_or("-")
        );
        for token in [player.exchange, player.confirm, player.cancel, player.sync] {
            let _ = writeln!(html, "          <td>{}</td>", fmt_token(token, now));
        }
    }
    html.push_str("        </tr>\n");
}

/// A token's age in seconds, or `-` for "never".
fn fmt_token(token: Token, now: Instant) -> String {
    match token.age(now) {
        Some(age) => fmt_duration(age),
        None => "-".to_string(),
    }
}

fn fmt_duration(duration: Duration) -> String {
    format!("{:.1}s", duration.as_secs_f64())
}
