// GET handlers: health, version

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use super::AppState;

/// GET /health — 200 "OK" when the runtime answers a ping, 500 with the error text otherwise.
pub(super) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.client.ping().await {
        Ok(()) => (StatusCode::OK, "OK".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
