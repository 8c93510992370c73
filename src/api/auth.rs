use axum::{
    Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SignupResponse, TokenResponse};

/// One message for both unknown-user and wrong-password, so signin cannot
/// be used to enumerate usernames.
const INVALID_CREDENTIALS: &str = "invalid username or password";

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Bearer-token check for the movie and review routes. Accepts
/// `Authorization: Bearer <jwt>` and the legacy `Authorization: JWT <jwt>`
/// scheme older clients send.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let Some(token) = extract_token(&headers) else {
        return Err(ApiError::Unauthorized(
            "missing authentication token".to_string(),
        ));
    };

    if state.tokens().verify(&token).is_err() {
        return Err(ApiError::Unauthorized(
            "invalid or expired token".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("Authorization")?.to_str().ok()?;

    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("JWT "))
        .map(|token| token.trim().to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /signup
/// Create a user. The password is hashed before it reaches the store.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<ApiResponse<SignupResponse>>, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation(
            "both username and password are required to signup",
        ));
    }

    let user = state
        .store()
        .create_user(
            payload.name.as_deref(),
            &payload.username,
            &payload.password,
        )
        .await?;

    tracing::info!("Created user: {}", user.username);

    Ok(Json(ApiResponse::success(SignupResponse {
        message: "Successfully created new user".to_string(),
    })))
}

/// POST /signin
/// Verify credentials and return a signed token carrying the user's
/// identity claims.
pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SigninRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation(
            "both username and password are required to signin",
        ));
    }

    let Some(user) = state
        .store()
        .get_user_by_username(&payload.username)
        .await?
    else {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let is_valid = state
        .store()
        .verify_user_password(&payload.username, &payload.password)
        .await?;

    if !is_valid {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = state
        .tokens()
        .issue(user.id, &user.username)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))?;

    Ok(Json(ApiResponse::success(TokenResponse { token })))
}
