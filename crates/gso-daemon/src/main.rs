//! gso-daemon entry point.
//!
//! This file is intentionally thin: it sets up tracing, builds the shared
//! state from the environment, runs the boot reconciliation pass, wires
//! middleware, and starts the HTTP server. All route handlers live in
//! `routes.rs`; all shared state types live in `state.rs`.

use std::{net::SocketAddr, path::Path, sync::Arc};

use anyhow::{bail, Context};
use axum::http::{HeaderValue, Method};
use gso_config::{SourceMode, StaticConfig};
use gso_daemon::{routes, state};
use gso_host::LocalProcessWorkload;
use gso_reconcile::Trigger;
use gso_render::ControlEndpoint;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env.local if present (dev convenience). Silent if the file does
    // not exist — production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let config = load_config_from_env()?;
    let root =
        std::env::var("GSO_WORKLOAD_ROOT").unwrap_or_else(|_| "workload".to_string());
    let control_ip =
        std::env::var("GSO_CONTROL_IP").unwrap_or_else(|_| "127.0.0.1".to_string());
    let mode = source_mode_from_env()?;

    let workload = LocalProcessWorkload::new(&root)?;
    let shared = Arc::new(state::AppState::new(
        config,
        workload,
        ControlEndpoint::new(control_ip),
        mode,
    ));

    // Boot pass: bring the status surface up to date before serving.
    let boot = routes::run_reconcile(&shared, Trigger::ConfigChanged).await;
    info!(state = %boot.state, reason = ?boot.reason, "boot reconcile complete");

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    let addr = bind_addr_from_env().unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8890)));
    info!("gso-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn load_config_from_env() -> anyhow::Result<StaticConfig> {
    let path =
        std::env::var("GSO_CONFIG_PATH").unwrap_or_else(|_| "gso.config.json".to_string());
    if !Path::new(&path).exists() {
        warn!(path, "no static config document found; starting empty");
        return Ok(StaticConfig::new());
    }
    let raw = std::fs::read_to_string(&path).with_context(|| format!("read config: {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parse config: {path}"))
}

fn source_mode_from_env() -> anyhow::Result<SourceMode> {
    match std::env::var("GSO_SOURCE_MODE")
        .unwrap_or_else(|_| "static".to_string())
        .as_str()
    {
        "static" => Ok(SourceMode::Static),
        "n2-relation" => Ok(SourceMode::N2Relation),
        other => bail!("unknown GSO_SOURCE_MODE: {other}"),
    }
}

fn bind_addr_from_env() -> Option<SocketAddr> {
    std::env::var("GSO_DAEMON_ADDR").ok()?.parse().ok()
}

/// CORS: allow only localhost origins.
fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any)
}
