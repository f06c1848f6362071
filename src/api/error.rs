use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::types::error::HhiError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid mint address: {0}")]
    InvalidMint(String),

    #[error("HHI computation failed: {0}")]
    Computation(#[from] HhiError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidMint(_) => StatusCode::BAD_REQUEST,
            ApiError::Computation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
