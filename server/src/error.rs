use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Missing required fields")]
    MissingFields,

    #[error("Database insert failed")]
    InsertFailed,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 405 keeps the plain text body, the rest are JSON error bodies.
        let status = match self {
            AppError::MethodNotAllowed => {
                return (StatusCode::METHOD_NOT_ALLOWED, self.to_string()).into_response();
            }
            AppError::InvalidJson => StatusCode::BAD_REQUEST,
            AppError::MissingFields => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InsertFailed => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
