//! Session-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::session::{validate_session_token, AuthSessionError};
use crate::error::AppError;
use crate::state::AppState;

/// Verified identity extracted from a `Bearer` session token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication. The `owner_id` inside is what handlers pass into every
/// store call; core logic never reads identity from ambient request state.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The user's document id.
    pub owner_id: String,
    /// The user's email address.
    pub email: String,
    /// The user's display name.
    pub display_name: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Session(AuthSessionError::Invalid))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Session(AuthSessionError::Invalid))?;

        let claims = validate_session_token(token, &state.config.session)?;

        Ok(CurrentUser {
            owner_id: claims.sub,
            email: claims.email,
            display_name: claims.name,
        })
    }
}
