//! # REST API for TechFest Competitions

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use shared::{NewTechnofest, TechfestRegistration, Technofest, TechnofestPatch};
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::{check_merged, StaffSession, ValidJson};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_technofests).post(create_technofest))
        .route("/slug/:slug", get(get_technofest_by_slug))
        .route(
            "/:id",
            get(get_technofest).put(update_technofest).delete(delete_technofest),
        )
        .route("/:id/registrations", get(list_technofest_registrations))
}

/// `?category=` takes precedence over `?active=true`
#[derive(Debug, Default, Deserialize)]
pub struct TechnofestFilter {
    pub category: Option<String>,
    #[serde(default)]
    pub active: bool,
}

pub async fn list_technofests(
    State(state): State<AppState>,
    Query(filter): Query<TechnofestFilter>,
) -> Result<Json<Vec<Technofest>>, ApiError> {
    info!("GET /api/technofests - filter: {:?}", filter);
    let technofests = match filter.category {
        Some(category) => state.storage.list_technofests_by_category(&category).await?,
        None if filter.active => state.storage.list_active_technofests().await?,
        None => state.storage.list_technofests().await?,
    };
    Ok(Json(technofests))
}

pub async fn get_technofest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Technofest>, ApiError> {
    info!("GET /api/technofests/{}", id);
    Ok(Json(state.storage.get_technofest(&id).await.or_not_found("Technofest")?))
}

pub async fn get_technofest_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Technofest>, ApiError> {
    info!("GET /api/technofests/slug/{}", slug);
    Ok(Json(
        state
            .storage
            .get_technofest_by_slug(&slug)
            .await
            .or_not_found("Technofest")?,
    ))
}

pub async fn create_technofest(
    State(state): State<AppState>,
    _staff: StaffSession,
    ValidJson(input): ValidJson<NewTechnofest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/technofests - name: {}", input.name);
    let technofest = state.storage.create_technofest(input).await?;
    Ok((StatusCode::CREATED, Json(technofest)))
}

pub async fn update_technofest(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
    Json(patch): Json<TechnofestPatch>,
) -> Result<Json<Technofest>, ApiError> {
    info!("PUT /api/technofests/{}", id);
    let current = state.storage.get_technofest(&id).await.or_not_found("Technofest")?;
    check_merged(current, |record| patch.clone().apply_to(record, Utc::now()))?;
    Ok(Json(
        state
            .storage
            .update_technofest(&id, patch)
            .await
            .or_not_found("Technofest")?,
    ))
}

/// Also removes the competition's registrations and their members
pub async fn delete_technofest(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/technofests/{}", id);
    deleted(state.storage.delete_technofest(&id).await, "Technofest")
}

pub async fn list_technofest_registrations(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<Json<Vec<TechfestRegistration>>, ApiError> {
    info!("GET /api/technofests/{}/registrations", id);
    Ok(Json(state.storage.list_techfest_registrations_for_event(&id).await?))
}
