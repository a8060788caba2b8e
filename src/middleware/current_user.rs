use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the authenticated user's id, set by the upstream auth layer
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user a request acts on behalf of
///
/// Rejects with 401 when the header is missing or not a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Not signed in".to_string()))?;

        raw.to_str()
            .ok()
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Malformed user id".to_string()))
    }
}
