use anyhow::Result;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::AppState;

/// Cookie carrying the admin session token
pub const TOKEN_COOKIE: &str = "token";

/// Claims carried by an admin session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Admin email
    pub exp: usize,  // Expiration timestamp
}

/// Sign a session token for an allow-listed admin.
pub fn sign(email: &str, secret: &[u8], ttl_hours: i64) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| anyhow::anyhow!("token expiry out of range"))?
        .timestamp();

    let claims = Claims {
        sub: email.to_owned(),
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )?;

    Ok(token)
}

/// Verify signature and expiry of a session token and decode its claims.
pub fn verify(token: &str, secret: &[u8]) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Check a password against the configured argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("invalid password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Authenticated admin extracted from the `Authorization: Bearer <token>`
/// header or the `token` cookie.
///
/// Add this as a handler parameter to gate a route. Verification fails
/// closed: a missing, invalid or expired token, or an identity outside the
/// allow-list, all reject with 401.
pub struct AdminUser {
    pub email: String,
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.to_string());

        let token = match bearer {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get(TOKEN_COOKIE)
                .map(|c| c.value().to_string())
                .ok_or_else(|| ApiError::unauthorized("Authentication required"))?,
        };

        let claims = verify(&token, state.config.auth.token_secret.as_bytes())
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        if !state.config.auth.is_admin(&claims.sub) {
            tracing::warn!(email = %claims.sub, "Unauthorized admin access attempt");
            return Err(ApiError::unauthorized(
                "You are not authorized to access the admin dashboard",
            ));
        }

        Ok(AdminUser { email: claims.sub })
    }
}
