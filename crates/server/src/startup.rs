use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use service::backend::{BackendsConfig, ClientFactory, ExecutionContext};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Assemble the router from an already-built factory.
pub async fn build_app(cfg: &AppConfig, factory: &ClientFactory) -> anyhow::Result<Router> {
    let state = AppState::from_factory(cfg, factory).await?;
    Ok(routes::build_router(state, build_cors()))
}

/// Serve the API with an already loaded and validated configuration.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let factory = ClientFactory::new(BackendsConfig::from(&cfg), ExecutionContext::Server);
    let app = build_app(&cfg, &factory).await?;

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting adoption api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
