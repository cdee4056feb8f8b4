//! Handlers for the `/flashcards` resource.
//!
//! Create is the one interesting path: validate the request into a
//! [`GenerationRequest`], run the generator, and persist only on success.
//! A failed generation returns an error and leaves nothing behind.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cardsmith_core::{FlashcardSet, FlashcardSetSummary, GenerationRequest};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /flashcards`.
#[derive(Debug, Deserialize)]
pub struct CreateFlashcardsRequest {
    pub topic: String,
    /// Defaults to the configured cards-per-set; out-of-range values are
    /// clamped, not rejected.
    pub count: Option<u32>,
}

/// POST /api/v1/flashcards
///
/// Generate a flashcard set for a topic and persist it for the caller.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<CreateFlashcardsRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<FlashcardSet>>)> {
    let generator = state
        .generator
        .as_ref()
        .ok_or(AppError::GenerationDisabled)?;

    let count = input.count.unwrap_or(state.config.cards_per_set);
    let request = GenerationRequest::new(&input.topic, count, &state.config.limits)?;

    let cards = generator.generate(&request).await?;

    let set = state
        .sets
        .save(&user.owner_id, request.topic(), cards)
        .await?;

    let message = format!(
        "Successfully created {} flashcards for \"{}\"!",
        set.cards.len(),
        set.title
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(set, message)),
    ))
}

/// GET /api/v1/flashcards
///
/// The caller's sets, newest first.
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<DataResponse<Vec<FlashcardSetSummary>>>> {
    let summaries = state.sets.list_by_owner(&user.owner_id).await?;
    Ok(Json(DataResponse::new(summaries)))
}

/// GET /api/v1/flashcards/{id}
///
/// One set, owner-scoped: someone else's set id 404s exactly like a
/// nonexistent one.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<FlashcardSet>>> {
    let set = state.sets.get_by_id(&id, &user.owner_id).await?;
    Ok(Json(DataResponse::new(set)))
}

/// DELETE /api/v1/flashcards/{id}
///
/// Owner-scoped delete. Returns 204 No Content.
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.sets.delete(&id, &user.owner_id).await?;
    tracing::info!(owner_id = %user.owner_id, set_id = %id, "Flashcard set deleted");
    Ok(StatusCode::NO_CONTENT)
}
