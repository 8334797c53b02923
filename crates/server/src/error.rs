use crate::envelope::ApiResponse;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::services::ServiceError;
use log::error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Not allowed to perform this action")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Already enrolled in this course")]
    AlreadyEnrolled,

    #[error("Payment is required to enroll in this course")]
    PaymentRequired,

    #[error("{0}")]
    Validation(String),

    #[error("Internal server error")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyEnrolled => StatusCode::CONFLICT,
            AppError::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(entity) => AppError::NotFound(entity),
            ServiceError::AlreadyEnrolled => AppError::AlreadyEnrolled,
            ServiceError::Forbidden => AppError::Forbidden,
            ServiceError::Validation(message) => AppError::Validation(message),
            ServiceError::PaymentRequired => AppError::PaymentRequired,
            ServiceError::Database(err) => AppError::Internal(Box::new(err)),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Details stay in the log, the client only sees the generic message
        if let AppError::Internal(source) = &self {
            error!("Request failed: {source}");
        }

        ApiResponse::error(status, self.to_string()).into_response()
    }
}
