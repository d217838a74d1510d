//! # REST API for the Gallery

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use shared::{GalleryImage, GalleryImagePatch, NewGalleryImage};
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::{check_merged, StaffSession, ValidJson};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_gallery_images).post(create_gallery_image))
        .route(
            "/:id",
            get(get_gallery_image).put(update_gallery_image).delete(delete_gallery_image),
        )
}

pub async fn list_gallery_images(State(state): State<AppState>) -> Result<Json<Vec<GalleryImage>>, ApiError> {
    info!("GET /api/gallery");
    Ok(Json(state.storage.list_gallery_images().await?))
}

pub async fn get_gallery_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GalleryImage>, ApiError> {
    info!("GET /api/gallery/{}", id);
    Ok(Json(state.storage.get_gallery_image(&id).await.or_not_found("Gallery image")?))
}

pub async fn create_gallery_image(
    State(state): State<AppState>,
    _staff: StaffSession,
    ValidJson(input): ValidJson<NewGalleryImage>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/gallery - event: {}", input.event_id);
    let image = state.storage.create_gallery_image(input).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn update_gallery_image(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
    Json(patch): Json<GalleryImagePatch>,
) -> Result<Json<GalleryImage>, ApiError> {
    info!("PUT /api/gallery/{}", id);
    let current = state.storage.get_gallery_image(&id).await.or_not_found("Gallery image")?;
    check_merged(current, |record| patch.clone().apply_to(record))?;
    Ok(Json(
        state
            .storage
            .update_gallery_image(&id, patch)
            .await
            .or_not_found("Gallery image")?,
    ))
}

pub async fn delete_gallery_image(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/gallery/{}", id);
    deleted(state.storage.delete_gallery_image(&id).await, "Gallery image")
}
