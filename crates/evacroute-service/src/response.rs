//! Success envelope, the counterpart of [`crate::ProblemDetails`].

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Successful payload with the request id that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,
    pub request_id: String,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T, request_id: impl Into<String>) -> Self {
        Self {
            data,
            request_id: request_id.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
