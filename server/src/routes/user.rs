//! Acting-user extractor.

use axum::extract::FromRef;
use axum::http::request::Parts;

use super::error::ApiError;
use crate::state::AppState;

pub const USER_HEADER: &str = "x-user-id";

/// The user a request acts as: the `x-user-id` header when present,
/// otherwise the configured default user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub uuid::Uuid);

impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(USER_HEADER) else {
            return Ok(Self(AppState::from_ref(state).default_user_id));
        };
        let value = raw.to_str().map_err(|_| malformed_user())?;
        value.trim().parse().map(Self).map_err(|_| malformed_user())
    }
}

fn malformed_user() -> ApiError {
    ApiError::Validation(format!("{USER_HEADER}: must be a UUID"))
}

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;
