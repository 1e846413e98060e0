//! Error types for the Pantry Tracker application

use thiserror::Error;

/// Application-wide error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Unknown filter tag or onboarding stage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("Unknown {kind}: {tag}")]
    Unknown { kind: &'static str, tag: String },
}

impl From<TagError> for AppError {
    fn from(err: TagError) -> Self {
        AppError::Validation(err.to_string())
    }
}
