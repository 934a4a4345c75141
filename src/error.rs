use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// `detail` is already filtered by the runtime mode.
    #[error("{message}")]
    Database {
        message: &'static str,
        detail: Option<String>,
    },
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MalformedPayload(detail) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    success: false,
                    message: "Malformed payload".to_string(),
                    error: Some(detail),
                },
            ),
            ApiError::Database { message, detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    success: false,
                    message: message.to_string(),
                    error: detail,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
