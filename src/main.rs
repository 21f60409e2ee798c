// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Embed Guard Service
//!
//! Validation, sanitization and rate limiting in front of an application
//! that turns user-supplied video links into embeds:
//!
//! - 10 submissions per minute per caller (default, sliding window)
//! - Dangerous content detection and neutralization
//! - Domain allow-list on the parsed host
//! - Exact 11-character video reference extraction
//! - Fixed-parameter embed URLs pinned to the application origin
//! - Upload metadata checks and random tokens
//!
//! ## Configuration
//!
//! Configuration is loaded from an optional JSON file named by `CONFIG_FILE`,
//! then overridden by environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_LIMIT_MAX_REQUESTS`: Submissions per window (default: 10)
//! - `RATE_LIMIT_WINDOW_MS`: Window length in milliseconds (default: 60000)
//! - `RATE_LIMIT_TRUST_CLIENT_IDENTIFIER`: Key the limiter on the body identifier (default: false)
//! - `ALLOWED_DOMAINS`: Comma-separated host allow-list
//! - `MAX_URL_LENGTH`, `MAX_INPUT_LENGTH`, `MAX_FILE_SIZE_BYTES`
//! - `EMBED_ORIGIN`: Origin pinned into embed URLs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use embed_guard::{
    config::Config,
    handlers::{router, AppState},
    metrics::Metrics,
    validator::SubmissionValidator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = Config::load()?;
    info!(
        bind_addr = %config.bind_addr,
        max_requests = config.rate_limit.max_requests_per_window,
        window_ms = config.rate_limit.window_ms,
        allowed_domains = ?config.validation.allowed_domains,
        origin = %config.embed.origin,
        "Starting embed guard"
    );

    // Create application state
    let validator = SubmissionValidator::new(&config)?;
    let metrics = Metrics::new()?;

    let state = Arc::new(AppState {
        validator,
        metrics,
        config: config.clone(),
    });

    // Spawn cleanup task
    let cleanup_state = state.clone();
    let cleanup_interval = config.rate_limit.cleanup_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            cleanup_state.validator.limiter().cleanup(Instant::now());
        }
    });

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
