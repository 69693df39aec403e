use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use clinic_gate::{config, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up GATE_ROUTES_FILE, GATE_STATIC_DIR, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("Starting clinic gate in {:?} mode", config.environment);

    let source = config
        .gate
        .routes_file
        .as_ref()
        .map_or_else(|| "built-in clinic table".to_string(), |p| p.display().to_string());
    let gate = config
        .build_gate()
        .with_context(|| format!("failed to load routes from {source}"))?;
    tracing::info!(
        "Loaded {} route rules and {} public routes from {}",
        gate.table().len(),
        gate.public_routes().paths().len(),
        source
    );

    let app = server::app(Arc::new(gate), &config.server);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!(
        "Clinic gate listening on http://{}, serving {}",
        bind_addr,
        config.server.static_dir.display()
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
