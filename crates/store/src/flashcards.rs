//! The flashcard-set store contract.

use async_trait::async_trait;
use cardsmith_core::{Flashcard, FlashcardSet, FlashcardSetSummary};

use crate::error::StoreError;

/// CRUD contract for flashcard-set documents.
///
/// Every operation takes the verified `owner_id` as an explicit argument;
/// implementations must scope reads and deletes to that owner and report a
/// cross-owner access as [`StoreError::NotFoundOrForbidden`], identical to
/// a genuinely missing document.
#[async_trait]
pub trait FlashcardStore: Send + Sync {
    /// Persist a new set. The store assigns the id and stamps `created_at`.
    ///
    /// An empty card list is refused: a generation that produced nothing is
    /// a failure upstream and must never materialize as an empty set.
    async fn save(
        &self,
        owner_id: &str,
        title: &str,
        cards: Vec<Flashcard>,
    ) -> Result<FlashcardSet, StoreError>;

    /// Summaries of the owner's sets, `created_at` descending, ties broken
    /// by `id` descending.
    async fn list_by_owner(&self, owner_id: &str)
        -> Result<Vec<FlashcardSetSummary>, StoreError>;

    /// Fetch one set, owner-scoped.
    async fn get_by_id(&self, id: &str, owner_id: &str) -> Result<FlashcardSet, StoreError>;

    /// Delete one set, owner-scoped.
    async fn delete(&self, id: &str, owner_id: &str) -> Result<(), StoreError>;
}
