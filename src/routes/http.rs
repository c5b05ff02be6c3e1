// Handlers: version, hosts, summary, refresh

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::AppState;

/// Package version (from Cargo.toml).
const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Package name (from Cargo.toml).
const NAME: &str = env!("CARGO_PKG_NAME");

/// GET /version — service name and version.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/hosts — the full published snapshot.
pub(super) async fn hosts_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.poller.snapshot())
}

/// GET /api/hosts/{id} — one canonical host, 404 if not in the current snapshot.
pub(super) async fn host_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let snapshot = state.poller.snapshot();
    match snapshot.host(&id) {
        Some(host) => Json(host.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("unknown host {}", id) })),
        )
            .into_response(),
    }
}

/// GET /api/summary — counts, groups and connectivity only.
pub(super) async fn summary_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.poller.snapshot().summary())
}

/// POST /api/refresh — visible refresh; responds once it settles.
pub(super) async fn refresh_handler(State(state): State<AppState>) -> impl IntoResponse {
    tracing::info!(operation = "refresh", "on-demand refresh requested");
    Json(state.poller.refresh().await)
}
