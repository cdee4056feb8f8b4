//! Route definitions for the `/flashcards` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::flashcards;
use crate::state::AppState;

/// Routes mounted at `/flashcards` (all require auth).
///
/// ```text
/// POST   /       -> generate and persist a set
/// GET    /       -> list the caller's sets
/// GET    /{id}   -> fetch one set
/// DELETE /{id}   -> delete one set
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(flashcards::create).get(flashcards::list))
        .route(
            "/{id}",
            get(flashcards::get_by_id).delete(flashcards::delete),
        )
}
