//! Maps the mesh-wide error taxonomy onto HTTP responses. Lives here
//! rather than in `aegis-core` so the foundation crate stays
//! transport-agnostic; `axum::response::IntoResponse` can't be
//! implemented directly on `MeshError` from this crate (orphan rules),
//! so a thin local wrapper carries it instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub struct ApiError(pub aegis_core::MeshError);

impl From<aegis_core::MeshError> for ApiError {
    fn from(err: aegis_core::MeshError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::json!({
            "code": self.0.code(),
            "reason": self.0.reason(),
            "timestamp": self.0.timestamp(),
        });
        (status, Json(body)).into_response()
    }
}
