use std::sync::Arc;

use axum::{routing::post, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/slots", post(handlers::get_available_slots))
        .route("/bookable-dates", post(handlers::get_bookable_dates))
        .route("/validate", post(handlers::validate_slot))
        .route("/book", post(handlers::book_appointment))
        .with_state(state)
}
