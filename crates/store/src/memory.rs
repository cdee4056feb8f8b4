//! In-process store double.
//!
//! Backs the test suite and the credential-less dev mode: when no store
//! credentials are configured the service still runs, it just forgets
//! everything on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use cardsmith_core::{sort_summaries, Flashcard, FlashcardSet, FlashcardSetSummary};
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::flashcards::FlashcardStore;
use crate::user::{CreateUser, UserRecord, UserStore};

/// In-memory implementation of both store contracts.
#[derive(Default)]
pub struct MemoryStore {
    /// Users keyed by id.
    users: RwLock<HashMap<String, UserRecord>>,
    /// Flashcard sets keyed by owner id.
    sets: RwLock<HashMap<String, Vec<FlashcardSet>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pre-built set, bypassing id and timestamp assignment.
    /// Lets ordering tests pin `created_at` collisions.
    #[cfg(test)]
    async fn insert_raw(&self, set: FlashcardSet) {
        self.sets
            .write()
            .await
            .entry(set.owner_id.clone())
            .or_default()
            .push(set);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, input: CreateUser) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == input.email) {
            return Err(StoreError::AlreadyExists(input.email));
        }

        let user = UserRecord {
            id: format!("user_{}", Uuid::new_v4().simple()),
            email: input.email,
            display_name: input.display_name,
            password_hash: input.password_hash,
            created_at: Utc::now(),
            last_login: None,
        };
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn record_login(&self, id: &str) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(user) => {
                user.last_login = Some(Utc::now());
                Ok(())
            }
            None => Err(StoreError::WriteFailure(format!("no such user: {id}"))),
        }
    }
}

#[async_trait]
impl FlashcardStore for MemoryStore {
    async fn save(
        &self,
        owner_id: &str,
        title: &str,
        cards: Vec<Flashcard>,
    ) -> Result<FlashcardSet, StoreError> {
        if cards.is_empty() {
            return Err(StoreError::WriteFailure(
                "refusing to store an empty flashcard set".to_string(),
            ));
        }

        let set = FlashcardSet {
            id: Uuid::new_v4().simple().to_string(),
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            created_at: Utc::now(),
            cards,
        };

        self.sets
            .write()
            .await
            .entry(owner_id.to_string())
            .or_default()
            .push(set.clone());
        Ok(set)
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<FlashcardSetSummary>, StoreError> {
        let sets = self.sets.read().await;
        let mut summaries: Vec<FlashcardSetSummary> = sets
            .get(owner_id)
            .map(|owned| owned.iter().map(FlashcardSet::summary).collect())
            .unwrap_or_default();
        sort_summaries(&mut summaries);
        Ok(summaries)
    }

    async fn get_by_id(&self, id: &str, owner_id: &str) -> Result<FlashcardSet, StoreError> {
        let sets = self.sets.read().await;
        sets.get(owner_id)
            .and_then(|owned| owned.iter().find(|s| s.id == id))
            .cloned()
            .ok_or(StoreError::NotFoundOrForbidden)
    }

    async fn delete(&self, id: &str, owner_id: &str) -> Result<(), StoreError> {
        let mut sets = self.sets.write().await;
        let owned = sets.get_mut(owner_id).ok_or(StoreError::NotFoundOrForbidden)?;
        let before = owned.len();
        owned.retain(|s| s.id != id);
        if owned.len() == before {
            return Err(StoreError::NotFoundOrForbidden);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn cards() -> Vec<Flashcard> {
        vec![Flashcard::new("Q?", "A.")]
    }

    #[tokio::test]
    async fn save_assigns_id_and_timestamp() {
        let store = MemoryStore::new();
        let set = store.save("alice", "Biology", cards()).await.unwrap();
        assert!(!set.id.is_empty());
        assert_eq!(set.owner_id, "alice");
        assert_eq!(set.title, "Biology");
    }

    #[tokio::test]
    async fn empty_set_refused() {
        let store = MemoryStore::new();
        let result = store.save("alice", "Biology", Vec::new()).await;
        assert_matches!(result, Err(StoreError::WriteFailure(_)));
    }

    #[tokio::test]
    async fn cross_owner_fetch_indistinguishable_from_missing() {
        let store = MemoryStore::new();
        let set = store.save("alice", "Biology", cards()).await.unwrap();

        let foreign = store.get_by_id(&set.id, "mallory").await;
        let missing = store.get_by_id("no-such-id", "mallory").await;
        assert_matches!(foreign, Err(StoreError::NotFoundOrForbidden));
        assert_matches!(missing, Err(StoreError::NotFoundOrForbidden));

        // The owner still sees it.
        assert!(store.get_by_id(&set.id, "alice").await.is_ok());
    }

    #[tokio::test]
    async fn cross_owner_delete_refused() {
        let store = MemoryStore::new();
        let set = store.save("alice", "Biology", cards()).await.unwrap();

        assert_matches!(
            store.delete(&set.id, "mallory").await,
            Err(StoreError::NotFoundOrForbidden)
        );
        store.delete(&set.id, "alice").await.unwrap();
        assert_matches!(
            store.get_by_id(&set.id, "alice").await,
            Err(StoreError::NotFoundOrForbidden)
        );
    }

    #[tokio::test]
    async fn listing_orders_newest_first_with_id_tiebreak() {
        let store = MemoryStore::new();
        let at = |secs: i64| Utc.timestamp_opt(secs, 0).unwrap();
        let raw = |id: &str, secs: i64| FlashcardSet {
            id: id.to_string(),
            owner_id: "alice".to_string(),
            title: "t".to_string(),
            created_at: at(secs),
            cards: cards(),
        };

        // Insert out of order, with a created_at collision between b and c.
        store.insert_raw(raw("a", 100)).await;
        store.insert_raw(raw("b", 200)).await;
        store.insert_raw(raw("c", 200)).await;

        let summaries = store.list_by_owner("alice").await.unwrap();
        let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn listing_scoped_to_owner() {
        let store = MemoryStore::new();
        store.save("alice", "Hers", cards()).await.unwrap();
        store.save("bob", "His", cards()).await.unwrap();

        let alice = store.list_by_owner("alice").await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].title, "Hers");
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let store = MemoryStore::new();
        let input = CreateUser {
            email: "a@example.com".to_string(),
            display_name: "A".to_string(),
            password_hash: "$argon2id$stub".to_string(),
        };
        store.create(input.clone()).await.unwrap();
        assert_matches!(
            store.create(input).await,
            Err(StoreError::AlreadyExists(_))
        );
    }

    #[tokio::test]
    async fn record_login_stamps_timestamp() {
        let store = MemoryStore::new();
        let user = store
            .create(CreateUser {
                email: "a@example.com".to_string(),
                display_name: "A".to_string(),
                password_hash: "$argon2id$stub".to_string(),
            })
            .await
            .unwrap();
        assert!(user.last_login.is_none());

        store.record_login(&user.id).await.unwrap();
        let reloaded = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(reloaded.last_login.is_some());
    }
}
