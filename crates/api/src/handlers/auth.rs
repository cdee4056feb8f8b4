//! Handlers for the `/auth` resource (register, login, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cardsmith_store::CreateUser;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::session::generate_session_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`] and returned by `/me`.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and return a session token. The display name defaults
/// to the email local part.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    let email = input.email.trim().to_string();
    let normalized = RegisterRequest {
        email: email.clone(),
        ..input
    };
    normalized
        .validate()
        .map_err(|e| AppError::BadRequest(first_validation_message(&e)))?;
    validate_password_strength(&normalized.password).map_err(AppError::BadRequest)?;

    let display_name = normalized
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .unwrap_or_else(|| email.split('@').next().unwrap_or(&email).to_string());

    let password_hash = hash_password(&normalized.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .users
        .create(CreateUser {
            email,
            display_name,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    let response = auth_response(&state, &user.id, &user.email, &user.display_name)?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            response,
            "Registration successful! Welcome to Cardsmith!",
        )),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password and return a session token. A missing
/// account and a wrong password produce the same message.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    const BAD_CREDENTIALS: &str = "Invalid email or password. Please check your credentials.";

    let email = input.email.trim();
    if email.is_empty() || input.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let user = state
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    state.users.record_login(&user.id).await?;
    tracing::info!(user_id = %user.id, "User logged in");

    let response = auth_response(&state, &user.id, &user.email, &user.display_name)?;
    Ok(Json(DataResponse::with_message(
        response,
        "Login successful!",
    )))
}

/// POST /api/v1/auth/logout
///
/// Sessions are a single self-expiring token, so logout is the client
/// discarding it; this endpoint exists so the flow has a server-visible
/// end. Returns 204 No Content.
pub async fn logout(user: CurrentUser) -> StatusCode {
    tracing::info!(user_id = %user.owner_id, "User logged out");
    StatusCode::NO_CONTENT
}

/// GET /api/v1/auth/me
///
/// The identity bound to the presented session token.
pub async fn me(user: CurrentUser) -> Json<DataResponse<UserInfo>> {
    Json(DataResponse::new(UserInfo {
        id: user.owner_id,
        email: user.email,
        display_name: user.display_name,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue a session token and assemble the response payload.
fn auth_response(
    state: &AppState,
    user_id: &str,
    email: &str,
    display_name: &str,
) -> Result<AuthResponse, AppError> {
    let token = generate_session_token(user_id, email, display_name, &state.config.session)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        token,
        expires_in: state.config.session.expiry_days * 24 * 3600,
        user: UserInfo {
            id: user_id.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
        },
    })
}

/// First human-readable message out of a validator error set.
fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .find_map(|error| error.message.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| "Invalid request".to_string())
}
