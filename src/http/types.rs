use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::error::DomainError;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(ref message) = self {
            tracing::error!(%message, "request failed");
        }
        (status, axum::Json(ErrorBody { message: self.to_string() })).into_response()
    }
}

/// Maps a service failure, naming the attempted action in store errors.
pub fn failed(action: &'static str) -> impl Fn(DomainError) -> ApiError {
    move |err| match err {
        DomainError::Validation(message) => ApiError::Validation(message),
        DomainError::Persistence(message) => {
            ApiError::Internal(format!("Failed to {action}: {message}"))
        }
    }
}
