use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn search_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/rank", post(handlers::rank_entities))
        .route("/nearby", post(handlers::find_nearby))
        .with_state(state)
}
