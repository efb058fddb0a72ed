//! Registration and login handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use popflix_core::{Credentials, Registration, UserSummary};

use super::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserSummary,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Registration>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(registration) = payload?;
    let user = state.accounts().register(&registration)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered".to_string(),
            user_id: user.id,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(credentials) = payload?;
    let user = state.accounts().login(&credentials)?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: user.into(),
    }))
}
