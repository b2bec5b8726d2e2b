//! API Routes
//!
//! Configures the Axum router with all record store endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_table_handler, evict_handler, flush_handler, get_handler, health_handler,
    insert_handler, query_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /tables` - Register a table
/// - `PUT /records/:table/:key` - Store a record (write-back)
/// - `GET /records/:table/:key` - Retrieve a record (read-through)
/// - `GET /records/:table` - Predicate query against the backing store
/// - `POST /flush` - Persist dirty records now
/// - `POST /evict` - Run an idle-eviction pass now
/// - `GET /stats` - Get store statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/tables", post(create_table_handler))
        .route(
            "/records/:table/:key",
            put(insert_handler).get(get_handler),
        )
        .route("/records/:table", get(query_handler))
        .route("/flush", post(flush_handler))
        .route("/evict", post(evict_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
