//! RFC 9457 Problem Details responses.
//!
//! See <https://www.rfc-editor.org/rfc/rfc9457.html>.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use evacroute_lib::Error as LibError;

pub const PROBLEM_UNKNOWN_FLOOR: &str = "/problems/unknown-floor";
pub const PROBLEM_UNKNOWN_NODE: &str = "/problems/unknown-node";
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Error body returned by every endpoint.
///
/// ```
/// use axum::http::StatusCode;
/// use evacroute_service::{ProblemDetails, PROBLEM_UNKNOWN_NODE};
///
/// let problem = ProblemDetails::new(PROBLEM_UNKNOWN_NODE, "Unknown Node", StatusCode::NOT_FOUND)
///     .with_detail("unknown node kitchn on floor ground. Did you mean 'kitchen'?")
///     .with_request_id("req-1");
/// assert_eq!(problem.status, 404);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Request identifier of the failed call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.detail.as_deref().unwrap_or(""))
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(&self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}

/// Map a library error to the problem returned to the caller.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::UnknownFloor { .. } => {
            ProblemDetails::new(PROBLEM_UNKNOWN_FLOOR, "Unknown Floor", StatusCode::NOT_FOUND)
                .with_detail(error.to_string())
                .with_request_id(request_id)
        }
        LibError::UnknownNode { .. } => {
            ProblemDetails::new(PROBLEM_UNKNOWN_NODE, "Unknown Node", StatusCode::NOT_FOUND)
                .with_detail(error.to_string())
                .with_request_id(request_id)
        }
        LibError::InvalidHazardKind { .. }
        | LibError::PositionIsExit { .. }
        | LibError::NotOnStairs { .. }
        | LibError::NoPositionSelected => {
            ProblemDetails::bad_request(error.to_string(), request_id)
        }
        _ => ProblemDetails::internal_error(error.to_string(), request_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_node_maps_to_not_found_with_suggestion() {
        let error = LibError::UnknownNode {
            floor: "ground".to_string(),
            node: "kitchn".to_string(),
            suggestions: vec!["kitchen".to_string()],
        };
        let problem = from_lib_error(&error, "req-1");
        assert_eq!(problem.type_uri, PROBLEM_UNKNOWN_NODE);
        assert_eq!(problem.status, 404);
        assert!(problem
            .detail
            .as_deref()
            .is_some_and(|detail| detail.contains("Did you mean 'kitchen'?")));
        assert_eq!(problem.instance.as_deref(), Some("req-1"));
    }

    #[test]
    fn invalid_hazard_kind_is_a_bad_request() {
        let error = LibError::InvalidHazardKind {
            value: "lava".to_string(),
        };
        let problem = from_lib_error(&error, "req-2");
        assert_eq!(problem.status, 400);
        assert_eq!(problem.type_uri, PROBLEM_INVALID_REQUEST);
    }

    #[test]
    fn exit_as_position_is_a_bad_request() {
        let error = LibError::PositionIsExit {
            floor: "ground".to_string(),
            node: "A".to_string(),
        };
        let problem = from_lib_error(&error, "req-4");
        assert_eq!(problem.status, 400);
        assert_eq!(problem.type_uri, PROBLEM_INVALID_REQUEST);
    }

    #[test]
    fn serialises_type_field_and_skips_empty_options() {
        let problem = ProblemDetails::new(
            PROBLEM_UNKNOWN_FLOOR,
            "Unknown Floor",
            StatusCode::NOT_FOUND,
        );
        let json = serde_json::to_string(&problem).unwrap();
        assert!(json.contains("\"type\":\"/problems/unknown-floor\""));
        assert!(!json.contains("detail"));
        assert!(!json.contains("instance"));
    }

    #[test]
    fn response_uses_problem_content_type() {
        let response = ProblemDetails::bad_request("bad", "req-3").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            PROBLEM_CONTENT_TYPE
        );
    }
}
