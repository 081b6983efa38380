//! Typed errors and HTTP mapping.

use crate::model::Id;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Every error body rides under the same top-level message string.
pub const ERROR_MESSAGE: &str = "your query could not be completed";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Couldn't find {kind} with 'id'={id}")]
    NotFound { kind: &'static str, id: Id },
    /// Malformed or contradictory find parameters (bad number, negative
    /// bound, name mixed with a price bound).
    #[error("parameter is incorrect")]
    IncorrectParameter,
    /// No usable find parameter supplied.
    #[error("parameter cannot be missing")]
    MissingParameter,
    /// Write-time constraint violations, first-detected-first-listed.
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    pub fn not_found(kind: &'static str, id: Id) -> Self {
        AppError::NotFound { kind, id }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub message: &'static str,
    pub errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::IncorrectParameter
            | AppError::MissingParameter
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let errors = match self {
            AppError::Validation(messages) => messages,
            AppError::Db(e) => {
                tracing::error!(error = %e, "store failure");
                vec!["internal error".to_string()]
            }
            other => vec![other.to_string()],
        };
        let body = ErrorBody {
            message: ERROR_MESSAGE,
            errors,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = AppError::not_found("Item", 180984789);
        assert_eq!(err.to_string(), "Couldn't find Item with 'id'=180984789");
    }

    #[test]
    fn parameter_errors_use_fixed_strings() {
        assert_eq!(
            AppError::MissingParameter.to_string(),
            "parameter cannot be missing"
        );
        assert_eq!(
            AppError::IncorrectParameter.to_string(),
            "parameter is incorrect"
        );
    }
}
