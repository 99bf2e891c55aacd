use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, JSend};
use crate::auth::{self, TOKEN_COOKIE};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub email: String,
    pub token: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Handle admin login. Fails closed: the identity must be allow-listed and
/// the password must verify before a token is issued.
pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<JSend<LoginResponse>>), ApiError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    if !state.config.auth.is_admin(&email) {
        tracing::warn!(email = %email, "Login attempt by unlisted identity");
        return Err(ApiError::unauthorized(
            "You are not authorized to access the admin dashboard",
        ));
    }

    let valid = auth::verify_password(&req.password, &state.config.auth.admin_password_hash)
        .map_err(|e| ApiError::internal(format!("Password verification failed: {e}")))?;
    if !valid {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = auth::sign(
        &email,
        state.config.auth.token_secret.as_bytes(),
        state.config.auth.token_ttl_hours,
    )
    .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))?;

    // Path=/, Secure, not HttpOnly -- the login flow reads it back client-side
    let cookie = Cookie::build((TOKEN_COOKIE, token.clone()))
        .path("/")
        .secure(true)
        .http_only(false)
        .build();

    tracing::info!(email = %email, "Admin login");
    Ok((
        CookieJar::default().add(cookie),
        JSend::success(LoginResponse { email, token }),
    ))
}
