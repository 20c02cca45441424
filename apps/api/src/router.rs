use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use search_cell::router::search_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Healthcare portal API is running!" }))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/search", search_routes(state))
}
