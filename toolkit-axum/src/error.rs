use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use toolkit_core::{JsonResponse, ToolkitError};

use crate::upload::UploadError;

#[derive(Debug)]
pub struct ToolkitAxumError(pub ToolkitError);

impl From<ToolkitError> for ToolkitAxumError {
    fn from(e: ToolkitError) -> Self {
        Self(e)
    }
}

impl From<UploadError> for ToolkitAxumError {
    fn from(e: UploadError) -> Self {
        Self(e.source)
    }
}

impl IntoResponse for ToolkitAxumError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Server-side failures can carry paths or upstream details; keep those in the logs.
        let message = if status.is_server_error() {
            tracing::error!(error = %self.0, kind = self.0.kind().name(), "request failed");
            status
                .canonical_reason()
                .unwrap_or("internal server error")
                .to_string()
        } else {
            self.0.to_string()
        };

        let body: JsonResponse = JsonResponse::failure(message);
        (status, Json(body)).into_response()
    }
}
