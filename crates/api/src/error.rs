use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cardsmith_core::CoreError;
use cardsmith_inference::GenerationError;
use cardsmith_store::StoreError;
use serde_json::json;

use crate::auth::session::AuthSessionError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the component taxonomies (generation, store, session) and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent `{ "error": ..., "code": ... }` JSON; every component failure
/// is converted here, at the web boundary, and nothing crashes the process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain validation error from `cardsmith_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A generation failure from `cardsmith_inference`.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Generation was disabled at startup (no inference API key).
    #[error("Flashcard generation is disabled")]
    GenerationDisabled,

    /// A store failure from `cardsmith_store`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A session-token failure.
    #[error(transparent)]
    Session(#[from] AuthSessionError),

    /// Rejected credentials (login) with a user-facing message.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            AppError::Generation(err) => classify_generation_error(err),

            AppError::GenerationDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "GENERATION_DISABLED",
                "Flashcard generation is currently disabled. Please try again later."
                    .to_string(),
            ),

            AppError::Store(err) => classify_store_error(err),

            AppError::Session(AuthSessionError::Expired) => (
                StatusCode::UNAUTHORIZED,
                "SESSION_EXPIRED",
                "Your session has expired. Please log in again.".to_string(),
            ),
            AppError::Session(AuthSessionError::Invalid) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required. Please log in.".to_string(),
            ),

            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a generation failure to an HTTP status, error code, and user-facing
/// message. Endpoint details are logged, never echoed to the caller.
fn classify_generation_error(err: &GenerationError) -> (StatusCode, &'static str, String) {
    match err {
        GenerationError::EndpointUnavailable(detail) => {
            tracing::error!(error = %detail, "Inference endpoint unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "GENERATION_UNAVAILABLE",
                "The flashcard generator is unreachable. Please try again later.".to_string(),
            )
        }
        GenerationError::AuthFailure => {
            tracing::error!("Inference endpoint rejected the API credential");
            (
                StatusCode::BAD_GATEWAY,
                "GENERATION_FAILED",
                "Failed to generate flashcards. Please try again later.".to_string(),
            )
        }
        GenerationError::ParseFailure(detail) => {
            tracing::warn!(error = %detail, "Model response unusable");
            (
                StatusCode::BAD_GATEWAY,
                "GENERATION_FAILED",
                "Failed to generate flashcards. Please try again.".to_string(),
            )
        }
        GenerationError::EmptyResult => (
            StatusCode::BAD_GATEWAY,
            "GENERATION_FAILED",
            "The generator produced no usable flashcards. Please try again.".to_string(),
        ),
    }
}

/// Map a store failure to an HTTP status, error code, and message.
///
/// `NotFoundOrForbidden` stays a plain 404: ownership violations are
/// indistinguishable from missing documents by design.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::NotFoundOrForbidden => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Flashcard set not found".to_string(),
        ),
        StoreError::AlreadyExists(_) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            "That email is already registered. Please log in or use a different email."
                .to_string(),
        ),
        StoreError::WriteFailure(detail) => {
            tracing::error!(error = %detail, "Store write failed");
            (
                StatusCode::BAD_GATEWAY,
                "STORE_WRITE_FAILED",
                "Failed to save your flashcards. Please try again.".to_string(),
            )
        }
        StoreError::Unavailable(detail) => {
            tracing::error!(error = %detail, "Store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "The flashcard store is unreachable. Please try again later.".to_string(),
            )
        }
    }
}
