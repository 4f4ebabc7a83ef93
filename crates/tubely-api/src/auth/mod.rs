//! Bearer token authentication

pub mod jwt;

use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;

pub use jwt::{authenticate, get_bearer_token, make_jwt, validate_jwt, JwtClaims};

/// The user id carried by a valid access token.
///
/// Handlers that need to validate something before authentication (the upload route
/// parses its path id first) call [`authenticate`] directly instead.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user_id = authenticate(&parts.headers, state.config.jwt_secret())?;
        Ok(AuthUser(user_id))
    }
}
