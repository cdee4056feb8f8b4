pub mod auth;
pub mod flashcards;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register        register (public)
/// /auth/login           login (public)
/// /auth/logout          logout (requires auth)
/// /auth/me              current identity (requires auth)
///
/// /flashcards           create (POST), list (GET)
/// /flashcards/{id}      get (GET), delete (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/flashcards", flashcards::router())
}
