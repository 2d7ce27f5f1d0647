use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wrapper producing the `{"results": [...]}` envelope every read
/// endpoint returns.
#[derive(Debug)]
pub struct Results<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Results<T> {
    fn into_response(self) -> Response {
        let value = match serde_json::to_value(&self.0) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": true, "message": "Failed to serialize response data"})),
                )
                    .into_response();
            }
        };

        Json(json!({ "results": value })).into_response()
    }
}

// Convenience type alias for read handlers
pub type ApiResult<T> = Result<Results<T>, crate::error::ApiError>;
