use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub mod course;
pub mod enrollment;
pub mod user;

/// Failures surfaced by the service layer
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Already enrolled in this course")]
    AlreadyEnrolled,

    #[error("Not allowed to perform this action")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("Payment is required to enroll in this course")]
    PaymentRequired,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Whether an insert was rejected by a unique index
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
