//! Triage Backend — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use resilinet_triage::api::{self, AppState};
use resilinet_triage::config::AppConfig;
use resilinet_triage::gateway::{DynModelClient, GeminiClient};
use resilinet_triage::metrics::Metrics;
use resilinet_triage::score::ThreadRngVariance;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("resilinet_triage=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env()?;
    let metrics = Metrics::init();

    let classifier: DynModelClient = Arc::new(GeminiClient::new(&cfg));
    let state = AppState {
        classifier,
        variance: Arc::new(ThreadRngVariance),
    };

    let router = api::create_router(state).merge(metrics.router());

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, model = %cfg.model, "triage backend listening");
    axum::serve(listener, router).await?;
    Ok(())
}
