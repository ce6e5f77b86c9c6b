//! Binary entry point: CLI parsing, logging, server startup.

use clap::Parser;
use tradepost::{ServerError, TradeServer};
use tracing_subscriber::EnvFilter;

/// Polling trade rendezvous server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to bind. The game clients this protocol comes from
    /// expect port 80.
    #[arg(long, default_value = "0.0.0.0:80")]
    bind: String,

    /// Seconds of silence before a player is evicted; also the
    /// freshness window for every handshake token.
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Reject cancel/synchro between two codes sharing a numeric id.
    #[arg(long)]
    forbid_self_trade: bool,

    /// Secret gating the admin view of the status page. Generated and
    /// logged at startup when omitted.
    #[arg(long)]
    admin_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        timeout = args.timeout,
        forbid_self_trade = args.forbid_self_trade,
        "starting tradepost"
    );

    let mut builder = TradeServer::builder()
        .bind(&args.bind)
        .timeout_secs(args.timeout)
        .forbid_self_trade(args.forbid_self_trade);
    if let Some(secret) = args.admin_secret {
        builder = builder.admin_secret(secret);
    }

    let server = builder.build().await?;
    server.run().await
}
