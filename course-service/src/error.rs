use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
};
use service_core::error::AppError;
use thiserror::Error;

/// Failures of the course operations.
///
/// Domain outcomes are kept apart from infrastructure errors so handlers and
/// stores can match on them; both render through [`AppError`].
#[derive(Debug, Error)]
pub enum CourseError {
    #[error("course with this code already exists")]
    DuplicateCode,

    #[error("course not found")]
    NotFound,

    #[error("no data provided for update")]
    EmptyUpdate,

    #[error(transparent)]
    Service(#[from] AppError),
}

impl From<mongodb::error::Error> for CourseError {
    fn from(err: mongodb::error::Error) -> Self {
        CourseError::Service(AppError::from(err))
    }
}

impl From<validator::ValidationErrors> for CourseError {
    fn from(err: validator::ValidationErrors) -> Self {
        CourseError::Service(AppError::from(err))
    }
}

impl From<JsonRejection> for CourseError {
    fn from(rejection: JsonRejection) -> Self {
        CourseError::Service(AppError::from(rejection))
    }
}

impl From<CourseError> for AppError {
    fn from(err: CourseError) -> Self {
        let message = err.to_string();
        match err {
            CourseError::DuplicateCode | CourseError::EmptyUpdate => {
                AppError::BadRequest(anyhow::anyhow!(message))
            }
            CourseError::NotFound => AppError::NotFound(anyhow::anyhow!(message)),
            CourseError::Service(inner) => inner,
        }
    }
}

impl IntoResponse for CourseError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
