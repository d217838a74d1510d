//! # REST API for Admin Accounts

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use shared::{Admin, AdminPatch, NewAdmin};
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::{check_merged, AdminSession, ValidJson};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route("/:id", get(get_admin).put(update_admin).delete(delete_admin))
}

pub async fn list_admins(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<Admin>>, ApiError> {
    info!("GET /api/admins");
    Ok(Json(state.storage.list_admins().await?))
}

pub async fn get_admin(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<Admin>, ApiError> {
    info!("GET /api/admins/{}", id);
    Ok(Json(state.storage.get_admin(&id).await.or_not_found("Admin")?))
}

pub async fn create_admin(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidJson(input): ValidJson<NewAdmin>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/admins - username: {}", input.username);
    let admin = state.storage.create_admin(input).await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

pub async fn update_admin(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(patch): Json<AdminPatch>,
) -> Result<Json<Admin>, ApiError> {
    info!("PUT /api/admins/{}", id);
    let current = state.storage.get_admin(&id).await.or_not_found("Admin")?;
    check_merged(current, |record| patch.clone().apply_to(record))?;
    Ok(Json(state.storage.update_admin(&id, patch).await.or_not_found("Admin")?))
}

pub async fn delete_admin(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/admins/{}", id);
    deleted(state.storage.delete_admin(&id).await, "Admin")
}
