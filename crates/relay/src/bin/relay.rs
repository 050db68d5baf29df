//! GitHub → WeCom relay service binary.
//!
//! Standalone HTTP service that turns GitHub webhooks into WeCom robot messages.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use notify::WeComChannel;
use relay::{config::Config, server, Dispatcher};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("relay=info".parse()?)
                .add_directive("notify=info".parse()?),
        )
        .init();

    info!("Starting GitHub relay service...");

    // Load configuration
    let config = Config::default();

    let channel = WeComChannel::with_base_url(&config.wecom_base_url, config.wecom_timeout)
        .context("Failed to create WeCom channel")?;

    info!(
        base_url = %config.wecom_base_url,
        timeout_secs = config.wecom_timeout.as_secs(),
        "WeCom channel configured"
    );

    if config.default_bot_key.is_none() {
        warn!("No WECOM_BOT_KEY configured - requests must pass ?key=<bot key>");
    }

    // Build application state
    let dispatcher = Dispatcher::new(Arc::new(channel), config.default_bot_key.clone());
    let state = server::AppState {
        config: Arc::new(config.clone()),
        dispatcher: Arc::new(dispatcher),
    };

    // Build router
    let app = server::build_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(port = config.port, "Relay service listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
