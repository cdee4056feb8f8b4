use cardsmith_core::flashcard::{
    DEFAULT_CARDS_PER_SET, DEFAULT_MAX_TOPIC_LENGTH, MAX_CARDS_PER_SET, MIN_CARDS_PER_SET,
};
use cardsmith_core::GenerationLimits;
use cardsmith_inference::GroqConfig;
use cardsmith_store::FirestoreConfig;

use crate::auth::session::SessionConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development; the sub-configs
/// for the session, the inference endpoint, and the document store load
/// their own env vars. Loaded once at startup and passed into components at
/// construction; nothing reads the environment after that.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Inbound HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Verbose default log filter when set.
    pub debug: bool,
    /// Cards generated when the caller does not ask for a count.
    pub cards_per_set: u32,
    /// Bounds applied to every generation request.
    pub limits: GenerationLimits,
    /// Session token configuration.
    pub session: SessionConfig,
    /// Inference endpoint configuration.
    pub groq: GroqConfig,
    /// Document store configuration.
    pub firestore: FirestoreConfig,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT`                 | `8080`    |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    /// | `DEBUG`                | `false`   |
    /// | `FLASHCARDS_PER_SET`   | `8`       |
    /// | `MAX_TOPIC_LENGTH`     | `200`     |
    ///
    /// See [`SessionConfig::from_env`], [`GroqConfig::from_env`], and
    /// [`FirestoreConfig::from_env`] for the rest of the surface.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let debug = std::env::var("DEBUG")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let cards_per_set: u32 = std::env::var("FLASHCARDS_PER_SET")
            .unwrap_or_else(|_| DEFAULT_CARDS_PER_SET.to_string())
            .parse()
            .expect("FLASHCARDS_PER_SET must be a valid u32");

        let max_topic_length: usize = std::env::var("MAX_TOPIC_LENGTH")
            .unwrap_or_else(|_| DEFAULT_MAX_TOPIC_LENGTH.to_string())
            .parse()
            .expect("MAX_TOPIC_LENGTH must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            debug,
            cards_per_set,
            limits: GenerationLimits {
                min_cards: MIN_CARDS_PER_SET,
                max_cards: MAX_CARDS_PER_SET,
                max_topic_length,
            },
            session: SessionConfig::from_env(),
            groq: GroqConfig::from_env(),
            firestore: FirestoreConfig::from_env(),
        }
    }
}
