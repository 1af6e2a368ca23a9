use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use davpanel_engine::PanelError;
use serde_json::json;

/// A request rejected before any work started.
#[derive(Debug)]
pub struct ApiError(PanelError);

impl From<PanelError> for ApiError {
    fn from(err: PanelError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            PanelError::NotConnected(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}
