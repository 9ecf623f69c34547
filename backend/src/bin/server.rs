//! Timetable HTTP Server Binary
//!
//! Serves timetable queries over the sheet named in the configuration.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin timetable-server
//!
//! # Point at another sheet and cache it between requests
//! TIMETABLE_SHEET=week.xlsx TIMETABLE_RELOAD=cached cargo run --bin timetable-server
//! ```
//!
//! # Environment Variables
//!
//! - `TIMETABLE_CONFIG`: Path to a TOML config file (default: `timetable.toml` if present)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `TIMETABLE_SHEET`: Timetable sheet path
//! - `TIMETABLE_RELOAD`: `per_request` (default) or `cached`
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use timetable::config::{AppConfig, ReloadPolicy};
use timetable::http::{create_router, AppState};
use timetable::services::TimetableService;

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

    info!("Starting timetable HTTP server");

    let config = AppConfig::load()?;
    info!(
        sheet = %config.sheet.path.display(),
        reload = ?config.sheet.reload,
        groups = config.roster.groups.len(),
        "Configuration loaded"
    );

    let service = Arc::new(TimetableService::from_config(&config));

    // Warm the cache so the first request does not pay for the load
    if service.reload_policy() == ReloadPolicy::Cached {
        if let Err(e) = service.refresh().await {
            warn!(error = %e, "Initial sheet load failed; will retry on first request");
        }
    }

    let state = AppState::new(service).with_cors_origins(config.server.cors_origins.clone());
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
