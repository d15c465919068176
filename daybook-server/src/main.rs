mod routes;
mod singleton;
mod state;

use anyhow::{Context, Result};
use daybook_core::daybook::Daybook;
use daybook_core::daybook_config::DaybookConfig;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = DaybookConfig::load().context("Failed to load daybook config")?;
    init_tracing(&config.log_level);
    let daybook = Daybook::from_config(config)?;

    let server = daybook.config().server.clone();

    // Ensure only one instance is running
    let _lock = singleton::acquire_lock(server.port)?;

    let app = routes::app(AppState::new(daybook));

    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("daybook-server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
