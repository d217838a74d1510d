//! # REST API for Events
//!
//! Public event listings plus staff-only management, including bulk cleanup
//! of stale events and clearing the featured flag.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::{Event, EventPatch, GalleryImage, NewEvent, NewGalleryImage, Registration};
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::{check_merged, StaffSession, ValidJson};
use crate::domain::{Validate, ValidationError};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/with-images", post(create_event_with_images))
        .route("/cleanup", post(cleanup_old_events))
        .route("/unfeature-all", post(unfeature_all_events))
        .route("/:id", get(get_event).put(update_event).delete(delete_event))
        .route("/:id/gallery", get(list_event_gallery))
        .route("/:id/registrations", get(list_event_registrations))
}

/// An event and its gallery, created together
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWithImagesRequest {
    pub event: NewEvent,
    #[serde(default)]
    pub images: Vec<NewGalleryImage>,
}

impl Validate for EventWithImagesRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        self.event.validate()?;
        // eventId is assigned on creation, so only the image fields are checked
        for image in &self.images {
            if image.title.trim().is_empty() {
                return Err(ValidationError::Empty("title"));
            }
            if image.image_url.trim().is_empty() {
                return Err(ValidationError::Empty("imageUrl"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWithImages {
    pub event: Event,
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Serialize)]
pub struct AffectedCount {
    pub count: u64,
}

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    info!("GET /api/events");
    Ok(Json(state.storage.list_events().await?))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    info!("GET /api/events/{}", id);
    Ok(Json(state.storage.get_event(&id).await.or_not_found("Event")?))
}

pub async fn create_event(
    State(state): State<AppState>,
    _staff: StaffSession,
    ValidJson(input): ValidJson<NewEvent>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/events - title: {}", input.title);
    let event = state.storage.create_event(input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn create_event_with_images(
    State(state): State<AppState>,
    _staff: StaffSession,
    ValidJson(request): ValidJson<EventWithImagesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        "POST /api/events/with-images - title: {}, images: {}",
        request.event.title,
        request.images.len()
    );
    let (event, images) = state
        .storage
        .create_event_with_images(request.event, request.images)
        .await?;
    Ok((StatusCode::CREATED, Json(EventWithImages { event, images })))
}

pub async fn update_event(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, ApiError> {
    info!("PUT /api/events/{}", id);
    let current = state.storage.get_event(&id).await.or_not_found("Event")?;
    check_merged(current, |record| patch.clone().apply_to(record, Utc::now()))?;
    Ok(Json(state.storage.update_event(&id, patch).await.or_not_found("Event")?))
}

pub async fn delete_event(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/events/{}", id);
    deleted(state.storage.delete_event(&id).await, "Event")
}

pub async fn cleanup_old_events(
    State(state): State<AppState>,
    _staff: StaffSession,
) -> Result<Json<AffectedCount>, ApiError> {
    info!("POST /api/events/cleanup");
    let count = state.storage.cleanup_old_events().await?;
    info!("Removed {} stale events", count);
    Ok(Json(AffectedCount { count }))
}

pub async fn unfeature_all_events(
    State(state): State<AppState>,
    _staff: StaffSession,
) -> Result<Json<AffectedCount>, ApiError> {
    info!("POST /api/events/unfeature-all");
    let count = state.storage.unfeature_all_events().await?;
    Ok(Json(AffectedCount { count }))
}

pub async fn list_event_gallery(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<GalleryImage>>, ApiError> {
    info!("GET /api/events/{}/gallery", id);
    Ok(Json(state.storage.list_gallery_images_for_event(&id).await?))
}

pub async fn list_event_registrations(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<Json<Vec<Registration>>, ApiError> {
    info!("GET /api/events/{}/registrations", id);
    Ok(Json(state.storage.list_registrations_for_event(&id).await?))
}
