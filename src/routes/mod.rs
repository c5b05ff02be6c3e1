// Dashboard read API over the poller's published state

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::poller::HostPoller;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) poller: Arc<HostPoller>,
}

pub fn app(poller: Arc<HostPoller>) -> Router {
    let state = AppState { poller };
    Router::new()
        .route("/", get(|| async { "hostpulse: host telemetry dashboard" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/hosts", get(http::hosts_handler)) // GET /api/hosts
        .route("/api/hosts/{id}", get(http::host_handler)) // GET /api/hosts/{id}
        .route("/api/summary", get(http::summary_handler)) // GET /api/summary
        .route("/api/refresh", post(http::refresh_handler)) // POST /api/refresh
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
