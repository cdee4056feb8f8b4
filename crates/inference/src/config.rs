/// Default chat model requested from the endpoint.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

/// Default endpoint base URL (OpenAI-compatible surface).
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default bound on one outbound completion call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Inference endpoint configuration, loaded once at startup and handed to
/// [`crate::GroqClient`] at construction. Never read from ambient state
/// afterwards.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// Bearer credential for the endpoint. `None` (or a `gsk_dummy`
    /// placeholder) leaves the service running with generation disabled.
    pub api_key: Option<String>,
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Endpoint base URL, without the trailing `/chat/completions`.
    pub base_url: String,
    /// Hard timeout for one completion call.
    pub timeout_secs: u64,
}

impl GroqConfig {
    /// Load inference configuration from environment variables.
    ///
    /// | Env Var             | Default                                       |
    /// |---------------------|-----------------------------------------------|
    /// | `GROQ_API_KEY`      | -- (generation disabled when absent)          |
    /// | `GROQ_MODEL`        | `meta-llama/llama-4-scout-17b-16e-instruct`   |
    /// | `GROQ_BASE_URL`     | `https://api.groq.com/openai/v1`              |
    /// | `GROQ_TIMEOUT_SECS` | `30`                                          |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GROQ_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let model = std::env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let base_url = std::env::var("GROQ_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = std::env::var("GROQ_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("GROQ_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            model,
            base_url,
            timeout_secs,
        }
    }

    /// Whether a usable credential is configured.
    ///
    /// Placeholder keys (`gsk_dummy...`) count as absent so a templated
    /// `.env` file runs in the degraded "generation disabled" mode instead
    /// of failing on every request.
    pub fn enabled(&self) -> bool {
        match &self.api_key {
            Some(key) => !key.starts_with("gsk_dummy"),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> GroqConfig {
        GroqConfig {
            api_key: key.map(String::from),
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    #[test]
    fn missing_key_disables_generation() {
        assert!(!config_with_key(None).enabled());
    }

    #[test]
    fn placeholder_key_disables_generation() {
        assert!(!config_with_key(Some("gsk_dummy_for_local_dev")).enabled());
    }

    #[test]
    fn real_key_enables_generation() {
        assert!(config_with_key(Some("gsk_live_abc123")).enabled());
    }
}
