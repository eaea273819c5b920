//! HTTP front-end for evacuation routing.
//!
//! Handlers are thin: they resolve floor and node ids, take one hazard
//! snapshot, and hand everything else to `evacroute_lib`. Errors are returned
//! as RFC 9457 problem documents; "no route" is a normal response.
//!
//! # Endpoints
//!
//! - `GET /api/v1/floors`
//! - `GET /api/v1/floors/{floor}?position=<node>`
//! - `GET /api/v1/floors/{floor}/hazards`
//! - `PUT /api/v1/floors/{floor}/hazards/{node}` with `{"kind": "fire"}`
//! - `DELETE /api/v1/floors/{floor}/hazards/{node}`
//! - `POST /api/v1/route` with `{"floor": "ground", "start": "kitchen"}`
//! - `GET /health/live`, `GET /health/ready`

#![deny(warnings)]

pub mod handlers;
mod health;
pub mod logging;
mod problem;
pub mod request_id;
mod response;
mod state;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_UNKNOWN_FLOOR, PROBLEM_UNKNOWN_NODE,
};
pub use request_id::{extract_or_generate_request_id, RequestId, REQUEST_ID_HEADER};
pub use response::ServiceResponse;
pub use state::AppState;

/// Build the service router over shared state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/floors", get(handlers::list_floors))
        .route("/api/v1/floors/{floor}", get(handlers::floor_view))
        .route("/api/v1/floors/{floor}/hazards", get(handlers::list_hazards))
        .route(
            "/api/v1/floors/{floor}/hazards/{node}",
            put(handlers::put_hazard).delete(handlers::delete_hazard),
        )
        .route("/api/v1/route", post(handlers::route_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
