//! Service-account OAuth2 token exchange.
//!
//! Firestore's REST API wants an OAuth2 access token. We mint one from the
//! service-account key: sign an RS256 JWT assertion with the account's
//! private key, exchange it at the token URI, and cache the result until
//! shortly before expiry so steady-state requests pay no extra round trip.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// OAuth2 scope covering Firestore document access.
const FIRESTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Assertion lifetime in seconds (the maximum Google accepts).
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh this many seconds before the cached token expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// The fields we need from a service-account JSON key file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

/// Errors from the token exchange.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The private key could not be parsed or the assertion not signed.
    #[error("Service-account key error: {0}")]
    Key(#[from] jsonwebtoken::errors::Error),

    /// The token endpoint could not be reached.
    #[error("Token request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The token endpoint answered with a non-2xx status.
    #[error("Token endpoint error ({status}): {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'static str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    token: String,
    /// Unix timestamp after which the token must not be reused.
    refresh_after: i64,
}

/// Mints and caches access tokens for one service account.
pub struct TokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// Build a provider, parsing the PEM private key once up front so a
    /// corrupt key file fails at startup rather than on first use.
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Result<Self, TokenError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        Ok(Self {
            key,
            encoding_key,
            http,
            cached: Mutex::new(None),
        })
    }

    /// A currently-valid access token, minting a fresh one if needed.
    pub async fn access_token(&self) -> Result<String, TokenError> {
        let mut cached = self.cached.lock().await;

        let now = Utc::now().timestamp();
        if let Some(entry) = cached.as_ref() {
            if now < entry.refresh_after {
                return Ok(entry.token.clone());
            }
        }

        let assertion = self.sign_assertion(now)?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TokenError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(
            account = %self.key.client_email,
            expires_in = token.expires_in,
            "Minted Firestore access token"
        );

        let entry = CachedToken {
            token: token.access_token.clone(),
            refresh_after: now + token.expires_in - EXPIRY_MARGIN_SECS,
        };
        *cached = Some(entry);
        Ok(token.access_token)
    }

    fn sign_assertion(&self, now: i64) -> Result<String, TokenError> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: FIRESTORE_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        Ok(encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.encoding_key,
        )?)
    }
}
