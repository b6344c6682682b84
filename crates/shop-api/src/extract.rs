//! Bearer-token extractors for protected endpoints.
//!
//! `AuthUser` rejects requests without a valid, unexpired token (401);
//! `AdminUser` additionally rejects non-admin holders (403). Both fail
//! closed on any verification problem.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::services::Claims;
use crate::state::AppState;
use shop_core::ShopError;

/// Claims of the authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

/// Claims of an authenticated admin caller
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

/// Pull the token out of `Authorization: Bearer <token>`
fn bearer_token(parts: &Parts) -> Result<&str, ShopError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ShopError::Unauthorized("missing bearer token".to_string()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.auth.verify_token(token)?;
        Ok(AuthUser(claims))
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.is_admin {
            return Err(ApiError(ShopError::Forbidden));
        }
        Ok(AdminUser(claims))
    }
}
