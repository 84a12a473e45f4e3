//! Pizza drone route planning server.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pizzadrone_server::api;
use pizzadrone_server::config::Config;
use pizzadrone_server::loops;
use pizzadrone_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pizzadrone_server=debug".parse()?)
                .add_directive("pizzadrone_core=info".parse()?),
        )
        .init();

    tracing::info!("Starting pizza drone route planner...");

    let config = Config::from_env();
    let port = config.server_port;
    tracing::info!(
        "Region data from {}, delivering to {} ({}, {})",
        config.data_url,
        config.destination_name,
        config.destination.lng,
        config.destination.lat
    );
    let state = Arc::new(AppState::new(config)?);

    tokio::spawn(loops::region_refresh_loop::run_region_refresh_loop(state.clone()));

    let app = api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
