//! User documents and the user-store contract.

use async_trait::async_trait;
use cardsmith_core::types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A user document.
///
/// `password_hash` is an argon2id PHC string; plaintext passwords never
/// reach the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub last_login: Option<Timestamp>,
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}

/// CRUD contract for user documents.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::AlreadyExists`] when the
    /// email is already registered.
    async fn create(&self, input: CreateUser) -> Result<UserRecord, StoreError>;

    /// Look up a user by email (login path).
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Look up a user by id (session validation path).
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Stamp `last_login` with the current time.
    async fn record_login(&self, id: &str) -> Result<(), StoreError>;
}
