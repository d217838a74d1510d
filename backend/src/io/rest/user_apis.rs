//! # REST API for Community Users
//!
//! Account management for admins and super admins. Self-service sign-up
//! lives under `/api/auth/signup`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::{NewUser, User, UserPatch};
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::{check_merged, AdminSession, ValidJson};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/bulk", post(bulk_create_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/approve", post(approve_user))
}

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<User>>, ApiError> {
    info!("GET /api/users");
    Ok(Json(state.storage.list_users().await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    info!("GET /api/users/{}", id);
    Ok(Json(state.storage.get_user(&id).await.or_not_found("User")?))
}

pub async fn create_user(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidJson(input): ValidJson<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/users - username: {}", input.username);
    let user = state.storage.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn bulk_create_users(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidJson(inputs): ValidJson<Vec<NewUser>>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/users/bulk - count: {}", inputs.len());
    let users = state.storage.bulk_create_users(inputs).await?;
    Ok((StatusCode::CREATED, Json(users)))
}

pub async fn update_user(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, ApiError> {
    info!("PUT /api/users/{}", id);
    let current = state.storage.get_user(&id).await.or_not_found("User")?;
    check_merged(current, |record| patch.clone().apply_to(record))?;
    Ok(Json(state.storage.update_user(&id, patch).await.or_not_found("User")?))
}

pub async fn approve_user(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    info!("POST /api/users/{}/approve", id);
    Ok(Json(state.storage.approve_user(&id).await.or_not_found("User")?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/users/{}", id);
    deleted(state.storage.delete_user(&id).await, "User")
}
