use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use types::errors::EngineError;

use crate::models::ApiResponse;

/// Central error type for the HTTP API
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Engine(err) => match err {
                EngineError::InvalidOrder(_) | EngineError::InvalidStatus(_) => {
                    StatusCode::BAD_REQUEST
                }
                EngineError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                EngineError::CommitFailed(_) | EngineError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Engine(err) => err.reason(),
            AppError::BadRequest(msg) | AppError::NotFound(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ApiResponse::error(self.message()))).into_response()
    }
}
