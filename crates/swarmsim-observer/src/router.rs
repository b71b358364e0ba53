//! Axum router construction for the operator API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for cross-origin front ends.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the operator API.
///
/// See [`handlers`] for the route table. CORS allows any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Reads
        .route("/api/status", get(handlers::get_status))
        .route("/api/snapshot", get(handlers::get_snapshot))
        .route("/api/fleet", get(handlers::get_fleet))
        // Arena edits
        .route("/api/agents", post(handlers::add_agent))
        .route("/api/obstacles", post(handlers::add_obstacle))
        // Lifecycle
        .route("/api/simulation/start", post(handlers::start))
        .route("/api/simulation/stop", post(handlers::stop))
        .route("/api/simulation/reset", post(handlers::reset))
        // Runtime input
        .route("/api/select", post(handlers::select))
        .route("/api/cmd_vel", post(handlers::command_velocity))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
