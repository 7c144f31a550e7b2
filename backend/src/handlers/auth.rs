use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;
use uuid::Uuid;

use crate::constants::BEARER_PREFIX;
use crate::handlers::{ApiError, AppState};

/// The authenticated caller, taken from the bearer token's subject.
///
/// Extracting it also registers the caller as a known profile, so anyone who
/// has used the API can be swiped on.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let header = header
            .to_str()
            .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

        let token = header
            .strip_prefix(BEARER_PREFIX)
            .ok_or_else(|| ApiError::Unauthorized("Invalid token format".to_string()))?;

        let user_id = state.verifier.verify(token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })?;

        state.service.touch_profile(user_id).await?;

        Ok(AuthUser(user_id))
    }
}
