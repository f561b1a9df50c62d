use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/attendance", get(handlers::attendance::get_attendance))
        .route(
            "/api/attendance/mark",
            post(handlers::attendance::mark_attendance),
        )
        .route(
            "/api/attendance/bulk-mark",
            post(handlers::attendance::bulk_mark_attendance),
        )
        .route(
            "/api/attendance/summary/:event_day_id",
            get(handlers::attendance::attendance_summary),
        )
}
