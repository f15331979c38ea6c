//! Session verification for tokens issued by the hosted auth provider.
//!
//! Handlers that act on behalf of a user take an `AuthUser` argument; the
//! extractor rejects the request with 401 before the handler runs when the
//! bearer token is missing, malformed, expired or signed with another key.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

/// Claims carried by a session token. `sub` is the provider's user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// The signed-in user resolved from the request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

pub fn decode_session(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!("Rejected session token: {e}");
        AppError::Unauthorized
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let claims = decode_session(token, &state.config.auth_jwt_secret)?;
        if claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
