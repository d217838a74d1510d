//! # REST API for Site Settings
//!
//! Public reads so the client can pick up things like the background scene;
//! writes are staff-only upserts.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::SiteSetting;
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::StaffSession;
use crate::domain::ValidationError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_settings))
        .route("/:key", get(get_setting).put(set_setting).delete(delete_setting))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SettingValue {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct SetSettingRequest {
    pub value: String,
}

pub async fn list_settings(State(state): State<AppState>) -> Result<Json<Vec<SiteSetting>>, ApiError> {
    info!("GET /api/settings");
    Ok(Json(state.storage.list_site_settings().await?))
}

pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SettingValue>, ApiError> {
    info!("GET /api/settings/{}", key);
    let value = state.storage.get_site_setting(&key).await.or_not_found("Setting")?;
    Ok(Json(SettingValue { key, value }))
}

/// Inserts the key or overwrites its value
pub async fn set_setting(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(key): Path<String>,
    Json(request): Json<SetSettingRequest>,
) -> Result<Json<SiteSetting>, ApiError> {
    info!("PUT /api/settings/{}", key);
    if key.trim().is_empty() {
        return Err(ValidationError::Empty("key").into());
    }
    Ok(Json(state.storage.set_site_setting(&key, &request.value).await?))
}

pub async fn delete_setting(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/settings/{}", key);
    deleted(state.storage.delete_site_setting(&key).await, "Setting")
}
