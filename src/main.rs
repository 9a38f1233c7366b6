//! Gavel - chat-driven on-chain auction concierge
//!
//! Routes conversation events into per-user auction-creation flows, lists
//! live auctions from the aggregator contract, and serves the web page that
//! submits the final transaction.

mod api;
mod auctions;
mod bot;
mod chain;
mod config;
mod dialogue;
mod handoff;
mod listing;
mod sessions;

use api::{create_router, AppState};
use bot::Bot;
use chain::ChainClient;
use config::Config;
use listing::Explorer;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gavel=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = Config::from_env()?;
    let abis = config.load_abis()?;

    tracing::info!(
        rpc_url = %config.rpc_url,
        aggregator = %config.aggregator,
        "Chain endpoint configured"
    );

    // Wire up the bot
    let chain = Arc::new(ChainClient::new(&config.rpc_url, config.aggregator.clone())?);
    let explorer = Explorer::new(&config.explorer_url);
    let bot = Bot::new(chain, explorer, &config.web_base_url);

    let state = AppState::new(bot, abis);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Gavel listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
