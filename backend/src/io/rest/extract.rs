//! Request extractors: validated JSON bodies and bearer-token sessions.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::domain::{AuthError, Session, Validate};
use crate::AppState;

/// JSON body that has passed [`Validate`]. Malformed JSON and failed
/// validation are both 400s.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Reject an update whose merged record would fail [`Validate`]. Patches are
/// partial, so they are checked against the record they would produce.
pub fn check_merged<R: Validate>(mut current: R, merge: impl FnOnce(&mut R)) -> Result<(), ApiError> {
    merge(&mut current);
    current.validate()?;
    Ok(())
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

/// Any live session
pub struct CurrentSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let session = state.auth_service.resolve(token).await?;
        Ok(Self(session))
    }
}

/// A session allowed to manage site content
pub struct StaffSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for StaffSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        if !session.can_manage_content() {
            return Err(AuthError::Forbidden.into());
        }
        Ok(Self(session))
    }
}

/// A session allowed to manage accounts
pub struct AdminSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        if !session.can_manage_users() {
            return Err(AuthError::Forbidden.into());
        }
        Ok(Self(session))
    }
}

/// A community user's session; votes and replies are attributed to it
pub struct UserSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for UserSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentSession(session) = CurrentSession::from_request_parts(parts, state).await?;
        if session.user_id().is_none() {
            return Err(AuthError::Forbidden.into());
        }
        Ok(Self(session))
    }
}
