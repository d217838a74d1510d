//! # REST API for About Page Sections

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{AboutContent, AboutContentInput};
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::{StaffSession, ValidJson};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_about_content))
        .route(
            "/:section",
            get(get_about_content).put(upsert_about_content).delete(delete_about_content),
        )
}

pub async fn list_about_content(State(state): State<AppState>) -> Result<Json<Vec<AboutContent>>, ApiError> {
    info!("GET /api/about");
    Ok(Json(state.storage.list_about_content().await?))
}

pub async fn get_about_content(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<AboutContent>, ApiError> {
    info!("GET /api/about/{}", section);
    Ok(Json(state.storage.get_about_content(&section).await.or_not_found("About section")?))
}

/// Creates the section or overwrites it in place
pub async fn upsert_about_content(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(section): Path<String>,
    ValidJson(input): ValidJson<AboutContentInput>,
) -> Result<Json<AboutContent>, ApiError> {
    info!("PUT /api/about/{}", section);
    Ok(Json(state.storage.upsert_about_content(&section, input).await?))
}

pub async fn delete_about_content(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(section): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/about/{}", section);
    deleted(state.storage.delete_about_content(&section).await, "About section")
}
