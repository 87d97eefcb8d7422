//! HTTP surface for the relay gateway.
//!
//! The dispatch core lives in `relay-core`; this crate only lifts requests
//! off the wire, hands them to the [`Dispatcher`], and maps outcomes and
//! errors back onto HTTP.

pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use relay_core::config::GatewayConfig;
use relay_core::dispatch::Dispatcher;
use relay_core::store::HttpRemoteStore;
use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/actions/catalog", get(routes::catalog::get_catalog))
        .route("/api/actions/invoke", post(routes::invoke::invoke_action))
        .route(
            "/api/personas/resolve",
            get(routes::personas::resolve_persona),
        )
        .layer(cors)
        .with_state(state)
}

/// Build the production state: an HTTP store wired into a dispatcher.
pub fn app_state(config: GatewayConfig) -> AppState {
    let store = Arc::new(HttpRemoteStore::new(
        &config.store_url,
        &config.functions_url,
    ));
    AppState::new(Arc::new(Dispatcher::new(config, store)))
}

/// Start the gateway server.
pub async fn serve(config: GatewayConfig, port: u16) -> anyhow::Result<()> {
    let app = build_router(app_state(config));

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("relay gateway listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
