//! Liveness and readiness probes.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

const SERVICE: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floors_loaded: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floors_with_hazards: Option<usize>,
}

impl HealthStatus {
    pub fn alive() -> Self {
        Self {
            status: "ok".to_string(),
            service: SERVICE.to_string(),
            version: VERSION.to_string(),
            floors_loaded: None,
            floors_with_hazards: None,
        }
    }

    pub fn ready(floors: usize, floors_with_hazards: usize) -> Self {
        Self {
            floors_loaded: Some(floors),
            floors_with_hazards: Some(floors_with_hazards),
            ..Self::alive()
        }
    }
}

/// `GET /health/live`
pub async fn health_live() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthStatus::alive()))
}

/// `GET /health/ready`: loaded floors and floors carrying hazards.
///
/// An [`AppState`] holds a validated building, which always has a floor.
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let status = HealthStatus::ready(
        state.building().floors.len(),
        state.hazards().floors_with_hazards().len(),
    );
    (StatusCode::OK, Json(status))
}
