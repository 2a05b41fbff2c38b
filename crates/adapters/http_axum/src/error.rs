//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pixelhub_domain::error::PixelHubError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`PixelHubError`] to an HTTP response with appropriate status code.
pub struct ApiError(PixelHubError);

impl From<PixelHubError> for ApiError {
    fn from(err: PixelHubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PixelHubError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            PixelHubError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            PixelHubError::Remote(err) => {
                tracing::warn!(error = %err, "remote device error");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            PixelHubError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
