//! cardsmith-store: the flashcard store adapter.
//!
//! Maps users and flashcard sets to documents in an external managed store.
//! The [`UserStore`] and [`FlashcardStore`] traits are the adapter
//! contract; [`firestore::FirestoreStore`] talks to Firestore over its REST
//! API, while [`memory::MemoryStore`] backs the test suite and the
//! credential-less dev mode.
//!
//! Owner scoping is part of the contract: a fetch or delete of a set that
//! does not exist or belongs to another owner fails with
//! [`StoreError::NotFoundOrForbidden`], and callers cannot tell the two
//! cases apart.

pub mod config;
pub mod error;
pub mod firestore;
pub mod flashcards;
pub mod memory;
pub mod user;

pub use config::FirestoreConfig;
pub use error::StoreError;
pub use firestore::FirestoreStore;
pub use flashcards::FlashcardStore;
pub use memory::MemoryStore;
pub use user::{CreateUser, UserRecord, UserStore};
