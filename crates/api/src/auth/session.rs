//! Session tokens.
//!
//! A session is one HS256-signed token carrying the verified identity;
//! there is no server-side session state to revoke, the token simply
//! expires. Lifetime defaults to seven days.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Default session lifetime in days.
const DEFAULT_EXPIRY_DAYS: i64 = 7;

/// Fallback secret for credential-less dev runs. Startup logs a warning
/// when this is in use.
pub const DEV_SECRET: &str = "dev-secret-change-in-production";

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject -- the user's document id (`owner_id` for store calls).
    pub sub: String,
    /// The user's email address.
    pub email: String,
    /// The user's display name.
    pub name: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Session-token failures, split so the web layer can tell the user to log
/// in again versus rejecting a garbage token.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthSessionError {
    /// The token was valid once but has expired.
    #[error("Session expired")]
    Expired,
    /// The token is missing, malformed, or fails signature validation.
    #[error("Invalid session token")]
    Invalid,
}

/// Configuration for session-token generation and validation.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in days.
    pub expiry_days: i64,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var               | Default                |
    /// |-----------------------|------------------------|
    /// | `SESSION_SECRET`      | dev placeholder (warn) |
    /// | `SESSION_EXPIRY_DAYS` | `7`                    |
    pub fn from_env() -> Self {
        let secret = match std::env::var("SESSION_SECRET") {
            Ok(s) if !s.trim().is_empty() => s,
            _ => {
                tracing::warn!(
                    "SESSION_SECRET not set; using the dev placeholder. \
                     Do not run like this in production."
                );
                DEV_SECRET.to_string()
            }
        };

        let expiry_days: i64 = std::env::var("SESSION_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_DAYS.to_string())
            .parse()
            .expect("SESSION_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            expiry_days,
        }
    }
}

/// Issue a session token for the given identity.
pub fn generate_session_token(
    user_id: &str,
    email: &str,
    display_name: &str,
    config: &SessionConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        name: display_name.to_string(),
        exp: now + config.expiry_days * 24 * 3600,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate a session token, returning the embedded [`SessionClaims`].
pub fn validate_session_token(
    token: &str,
    config: &SessionConfig,
) -> Result<SessionClaims, AuthSessionError> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthSessionError::Expired,
        _ => AuthSessionError::Invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn test_config() -> SessionConfig {
        SessionConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_days: 7,
        }
    }

    #[test]
    fn generate_and_validate_round_trip() {
        let config = test_config();
        let token =
            generate_session_token("user_42", "a@example.com", "Alice", &config).unwrap();

        let claims = validate_session_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "user_42");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.name, "Alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_reports_expired() {
        let config = test_config();
        // Expired well past the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "user_1".to_string(),
            email: "a@example.com".to_string(),
            name: "A".to_string(),
            exp: now - 300,
            iat: now - 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(
            validate_session_token(&token, &config),
            Err(AuthSessionError::Expired)
        );
    }

    #[test]
    fn wrong_secret_reports_invalid() {
        let config_a = test_config();
        let config_b = SessionConfig {
            secret: "another-secret".to_string(),
            expiry_days: 7,
        };

        let token = generate_session_token("user_1", "a@example.com", "A", &config_a).unwrap();
        assert_eq!(
            validate_session_token(&token, &config_b),
            Err(AuthSessionError::Invalid)
        );
    }

    #[test]
    fn garbage_token_reports_invalid() {
        assert_eq!(
            validate_session_token("not-a-token", &test_config()),
            Err(AuthSessionError::Invalid)
        );
    }
}
