use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/events", get(handlers::events::get_events))
        .route("/api/events", post(handlers::events::create_event))
        .route("/api/events/current", get(handlers::events::current_event))
        .route("/api/events/:id", get(handlers::events::get_event))
        .route("/api/events/:id", put(handlers::events::update_event))
        .route("/api/events/:id/days", get(handlers::events::get_event_days))
        .route(
            "/api/events/days/:day_id",
            put(handlers::events::update_event_day),
        )
}
