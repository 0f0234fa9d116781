//! Session extractors.
//!
//! Authentication happens upstream; the auth proxy forwards the signed-in
//! user's id in the [`USER_ID_HEADER`] header. A request without the header
//! is anonymous.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::UserId;
use crate::error::GatewayError;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Optional session: `None` for anonymous visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session(pub Option<UserId>);

/// Required session; rejects anonymous requests with
/// [`GatewayError::Unauthorized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(Self(None));
        };
        let raw = value
            .to_str()
            .map_err(|_| GatewayError::InvalidRequest(format!("{USER_ID_HEADER} is not ASCII")))?;
        if raw.trim().is_empty() {
            return Ok(Self(None));
        }
        let user_id = raw
            .parse::<UserId>()
            .map_err(|e| GatewayError::InvalidRequest(format!("{USER_ID_HEADER}: {e}")))?;
        Ok(Self(Some(user_id)))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Session(session) = Session::from_request_parts(parts, state).await?;
        session.map(Self).ok_or(GatewayError::Unauthorized)
    }
}
