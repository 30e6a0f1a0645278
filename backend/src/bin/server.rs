//! Course generation HTTP server binary.
//!
//! Loads the configuration, connects the course backend client, sets up the
//! HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! COURSEGEN_BACKEND_URL=http://localhost:8000 cargo run --bin coursegen-server
//! ```
//!
//! # Environment Variables
//!
//! - `COURSEGEN_BACKEND_URL`: course backend base URL (overrides `coursegen.toml`)
//! - `COURSEGEN_TOKEN`: bearer token for the course backend
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use coursegen::client::BackendClient;
use coursegen::config::AppConfig;
use coursegen::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting course generation server");

    let config = AppConfig::load()?;
    info!("Course backend: {}", config.backend.base_url);

    let client = BackendClient::new(&config.backend)?;
    let state = AppState::with_client(client);
    let app = create_router(state);

    let addr: SocketAddr = config.server.bind_address().parse()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
