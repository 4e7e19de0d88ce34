//! Identity middleware and authorization guards
//!
//! The identity middleware runs once per request, before any route logic.
//! A request without a bearer token proceeds unauthenticated; a request
//! with one either resolves to a [`User`] attached to the request
//! extensions or terminates with an error. Routes opt into requiring an
//! identity through the [`CurrentUser`] extractor.

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::debug;

use crate::{error::ApiError, models::User, state::AppState};

/// Resolve an optional `Authorization: Bearer <token>` header to a user
///
/// A missing header, a non-Bearer scheme, or an empty credential is a
/// no-op. A present token must verify and resolve to an existing user,
/// otherwise the request fails; there is no anonymous fallback once a
/// token was supplied.
pub async fn identity_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Ok(next.run(req).await);
    };

    let token = bearer.token();
    if token.is_empty() {
        return Ok(next.run(req).await);
    }

    let claims = state.jwt_service.verify(token).map_err(|e| {
        debug!("Token verification failed: {}", e);
        ApiError::InvalidToken
    })?;

    // Exactly one lookup per authenticated request. A token referencing a
    // user that no longer exists is a lookup failure, not anonymity.
    let user = state
        .user_repository
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Authenticated user extractor
///
/// Passes through when the identity middleware attached a user; rejects
/// the request with 401 otherwise.
#[derive(Debug)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(CurrentUser)
            .ok_or(ApiError::Unauthorized)
    }
}

/// Optional identity extractor for routes that are public but enrich their
/// response for authenticated callers
#[derive(Debug)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<User>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn empty_parts() -> Parts {
        Request::builder().body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn current_user_rejects_without_identity() {
        let mut parts = empty_parts();

        let result = CurrentUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn current_user_passes_through_attached_identity() {
        let user = test_user();
        let mut parts = empty_parts();
        parts.extensions.insert(user.clone());

        let CurrentUser(extracted) = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(extracted.id, user.id);
    }

    #[tokio::test]
    async fn maybe_user_never_rejects() {
        let mut parts = empty_parts();
        let MaybeUser(none) = MaybeUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(none.is_none());

        let user = test_user();
        parts.extensions.insert(user.clone());
        let MaybeUser(some) = MaybeUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(some.unwrap().id, user.id);
    }
}
