// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::runtime_client::RuntimeClient;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) client: Arc<dyn RuntimeClient>,
}

pub fn app(client: Arc<dyn RuntimeClient>) -> Router {
    let state = AppState { client };
    Router::new()
        .route("/health", get(http::health_handler)) // GET /health
        .route("/version", get(http::version_handler)) // GET /version
        .with_state(state)
}
