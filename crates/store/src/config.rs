/// Default path of the service-account key file.
pub const DEFAULT_CREDENTIALS_PATH: &str = "firebase_key.json";

/// Document-store configuration, loaded once at startup and handed to
/// [`crate::FirestoreStore`] at construction.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Firebase/GCP project id. `None` degrades the service to the
    /// in-memory store.
    pub project_id: Option<String>,
    /// Path of the service-account JSON key file.
    pub credentials_path: String,
}

impl FirestoreConfig {
    /// Load store configuration from environment variables.
    ///
    /// | Env Var                     | Default             |
    /// |-----------------------------|---------------------|
    /// | `FIREBASE_PROJECT_ID`       | -- (memory store)   |
    /// | `FIREBASE_CREDENTIALS_PATH` | `firebase_key.json` |
    pub fn from_env() -> Self {
        let project_id = std::env::var("FIREBASE_PROJECT_ID")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let credentials_path = std::env::var("FIREBASE_CREDENTIALS_PATH")
            .unwrap_or_else(|_| DEFAULT_CREDENTIALS_PATH.into());

        Self {
            project_id,
            credentials_path,
        }
    }
}
