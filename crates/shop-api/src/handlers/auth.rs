//! Registration and login handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use shop_core::{PublicUser, ShopError};
use tracing::{info, instrument};

use crate::db::UserRepository;
use crate::error::ApiResult;
use crate::state::AppState;

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token + user returned by both register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

fn validate_registration(req: &RegisterRequest) -> Result<(), ShopError> {
    if !req.email.contains('@') || req.email.trim().is_empty() {
        return Err(ShopError::Validation("email: must be a valid email address".to_string()));
    }
    if req.password.len() < 6 {
        return Err(ShopError::Validation(
            "password: must be at least 6 characters".to_string(),
        ));
    }
    if req.full_name.trim().is_empty() {
        return Err(ShopError::Validation("full_name: must not be empty".to_string()));
    }
    Ok(())
}

/// Register a new account and issue a session token
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    validate_registration(&request)?;

    let users = UserRepository::new(&state.pool);

    if users.find_by_email(&request.email).await?.is_some() {
        return Err(ShopError::AlreadyExists.into());
    }

    let password_hash = state.auth.hash_password(request.password).await?;
    let user = users
        .create(&request.email, &password_hash, request.full_name.trim())
        .await?;

    let token = state.auth.issue_token(&user)?;

    info!(user_id = user.id, "registered new user");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.public(),
        }),
    ))
}

/// Verify credentials and issue a session token.
///
/// Unknown email and wrong password produce the identical error so the
/// response never reveals which one failed.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let users = UserRepository::new(&state.pool);

    let user = users
        .find_by_email(&request.email)
        .await?
        .ok_or(ShopError::InvalidCredentials)?;

    state
        .auth
        .verify_password(request.password, user.password_hash.clone())
        .await?;

    let token = state.auth.issue_token(&user)?;

    Ok(Json(AuthResponse {
        token,
        user: user.public(),
    }))
}
