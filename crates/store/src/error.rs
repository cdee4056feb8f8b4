#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document does not exist or belongs to another owner. The two
    /// cases are deliberately indistinguishable to avoid leaking which ids
    /// exist.
    #[error("Flashcard set not found")]
    NotFoundOrForbidden,

    /// A uniqueness rule was violated (duplicate registration email).
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A write reached the store but was rejected or failed.
    #[error("Store write failed: {0}")]
    WriteFailure(String),

    /// The store could not be reached or did not answer usefully.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
