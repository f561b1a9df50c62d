use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/analytics/dashboard",
            get(handlers::analytics::dashboard_stats),
        )
        .route(
            "/api/analytics/attendance-trends",
            get(handlers::analytics::attendance_trends),
        )
        .route(
            "/api/analytics/brigade-comparison",
            get(handlers::analytics::brigade_comparison),
        )
        .route(
            "/api/analytics/session-analysis",
            get(handlers::analytics::session_analysis),
        )
}
