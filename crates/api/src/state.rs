use std::sync::Arc;

use cardsmith_inference::FlashcardGenerator;
use cardsmith_store::{FlashcardStore, UserStore};

use crate::config::AppConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc`. The generator is `None`
/// when no inference API key was configured at startup ("generation
/// disabled"), in which case create requests fail with 503 while the rest
/// of the service keeps working.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<AppConfig>,
    /// User documents.
    pub users: Arc<dyn UserStore>,
    /// Flashcard-set documents.
    pub sets: Arc<dyn FlashcardStore>,
    /// Flashcard generator, absent when generation is disabled.
    pub generator: Option<Arc<FlashcardGenerator>>,
    /// Which store adapter backs this process (`firestore` or `memory`).
    pub store_label: &'static str,
}
