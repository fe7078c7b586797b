use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("not found")]
    NotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(?self);
        (status, self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
