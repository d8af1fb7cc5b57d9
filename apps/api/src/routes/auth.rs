//! Authentication endpoints.
//!
//! - `POST /auth/register` - create an account
//! - `POST /auth/token` - exchange credentials for an access token

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use lavka_core::NewUser;

use crate::error::{ApiError, ApiResult};
use crate::services::auth_service::TokenResponse;
use crate::services::Services;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/token", post(token))
}

/// Login form.
#[derive(Debug, Deserialize)]
pub struct UserLogin {
    pub username: String,
    pub password: String,
}

/// Registers a new account. Duplicate usernames come back as 400.
async fn register(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    info!(username = %new_user.username, "Registering new user");

    let user = Services::new(&state).auth().register_user(new_user).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "username": user.username,
        })),
    ))
}

/// Exchanges a username/password pair for an access token.
async fn token(
    State(state): State<AppState>,
    Json(form): Json<UserLogin>,
) -> ApiResult<Json<TokenResponse>> {
    info!(username = %form.username, "Token requested");

    let auth = Services::new(&state).auth();

    let user = auth
        .authenticate_user(&form.username, &form.password)
        .await?
        .ok_or_else(|| {
            warn!(username = %form.username, "Login failed");
            ApiError::Unauthorized
        })?;

    Ok(Json(auth.issue_token(&user)?))
}
