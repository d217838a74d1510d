//! # REST API for Announcements and Replies

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use shared::{Announcement, AnnouncementPatch, AnnouncementReply, NewAnnouncement};
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::{check_merged, StaffSession, UserSession, ValidJson};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_announcements).post(create_announcement))
        .route(
            "/:id",
            get(get_announcement).put(update_announcement).delete(delete_announcement),
        )
        .route("/:id/replies", get(list_replies).post(create_reply))
        .route("/replies/:id", delete(delete_reply))
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub content: String,
}

pub async fn list_announcements(State(state): State<AppState>) -> Result<Json<Vec<Announcement>>, ApiError> {
    info!("GET /api/announcements");
    Ok(Json(state.storage.list_announcements().await?))
}

pub async fn get_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Announcement>, ApiError> {
    info!("GET /api/announcements/{}", id);
    Ok(Json(state.storage.get_announcement(&id).await.or_not_found("Announcement")?))
}

pub async fn create_announcement(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    ValidJson(mut input): ValidJson<NewAnnouncement>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/announcements - title: {}", input.title);
    input.created_by = session.subject_id().to_string();
    let announcement = state.storage.create_announcement(input).await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

pub async fn update_announcement(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
    Json(patch): Json<AnnouncementPatch>,
) -> Result<Json<Announcement>, ApiError> {
    info!("PUT /api/announcements/{}", id);
    let current = state.storage.get_announcement(&id).await.or_not_found("Announcement")?;
    check_merged(current, |record| patch.clone().apply_to(record, Utc::now()))?;
    Ok(Json(
        state
            .storage
            .update_announcement(&id, patch)
            .await
            .or_not_found("Announcement")?,
    ))
}

pub async fn delete_announcement(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/announcements/{}", id);
    deleted(state.storage.delete_announcement(&id).await, "Announcement")
}

pub async fn list_replies(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AnnouncementReply>>, ApiError> {
    info!("GET /api/announcements/{}/replies", id);
    Ok(Json(state.storage.list_announcement_replies(&id).await?))
}

pub async fn create_reply(
    State(state): State<AppState>,
    UserSession(session): UserSession,
    Path(id): Path<String>,
    Json(request): Json<ReplyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/announcements/{}/replies - user: {}", id, session.username);
    let reply = state
        .announcement_service
        .reply(&id, session.subject_id(), &request.content)
        .await
        .or_not_found("Announcement")?;
    Ok((StatusCode::CREATED, Json(reply)))
}

pub async fn delete_reply(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/announcements/replies/{}", id);
    deleted(state.storage.delete_announcement_reply(&id).await, "Reply")
}
