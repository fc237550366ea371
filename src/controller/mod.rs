use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::HeaderValue;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::helpers::handler_404::page_not_found_handler;
use crate::services::search_service::SearchService;

pub mod health_check;
pub mod restaurant_controller;

#[derive(Clone)]
pub struct AppState {
    pub search_service: Arc<SearchService>,
}

pub async fn serve(app_state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let application = router_endpoints(app_state);

    info!("API server listening on: {}", addr);
    axum::Server::try_bind(&addr)
        .context("Error binding the API server")?
        .serve(application.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Error spinning up the API server")
}

pub fn router_endpoints(app_state: AppState) -> Router {
    health_check::router()
        .merge(restaurant_controller::router(app_state))
        .fallback(page_not_found_handler)
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("GET"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static(CORS_ALLOWED_HEADERS),
                )),
        )
}

/// CORS headers go on every response, OPTIONS included; OPTIONS itself is
/// not served, so `/search` answers it with 501 like any other non-GET.
const CORS_ALLOWED_HEADERS: &str =
    "Accept, Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization";

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received, draining in-flight requests");
    }
}
