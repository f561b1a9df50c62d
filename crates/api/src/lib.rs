//! # Rollcall API
//!
//! The API crate provides the web server implementation for the rollcall
//! attendance service. It exposes RESTful endpoints for marking attendance,
//! querying records, schedule lookups, and role-scoped analytics.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Provide cross-cutting concerns like identity extraction
//!   and error handling
//! - **Visibility**: Resolve each caller's role into the set of students and
//!   brigades they may see or touch
//! - **Notify**: One-way outbound port for attendance-marked events
//!
//! The API uses Axum as the web framework and SQLx for database interactions.
//! Every read and write passes through the visibility filter before any
//! business rule runs.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for identity extraction and error handling
pub mod middleware;
/// Outbound notification port
pub mod notify;
/// Route definitions and API endpoint structure
pub mod routes;
/// Role-scoped visibility resolution
pub mod visibility;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers.
///
/// Dependencies are injected here once at startup — the database pool and
/// the notification port — so handlers never reach for process-wide state.
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    /// Outbound channel for attendance-marked events
    pub notifier: Arc<dyn notify::Notifier>,
}

/// Builds the application router over the given state.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Event schedule endpoints
        .merge(routes::events::routes())
        // Attendance marking and record endpoints
        .merge(routes::attendance::routes())
        // Analytics endpoints
        .merge(routes::analytics::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and database
/// connection. Initializes logging, builds the router, and serves until the
/// process exits.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let state = Arc::new(ApiState {
        db_pool,
        notifier: Arc::new(notify::BroadcastNotifier::default()),
    });

    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins: Vec<axum::http::HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Request tracing and timeout middleware
    let app = app
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(
            tower::ServiceBuilder::new()
                .timeout(std::time::Duration::from_secs(config.request_timeout))
                .into_inner(),
        );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
