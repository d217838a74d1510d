//! # REST API for TechFest Team Registrations
//!
//! Teams sign up publicly with their member list in one request; the rest is
//! staff-only review.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::{
    MemberDetails, NewTechfestRegistration, RegistrationMember, TechfestRegistration,
    TechfestRegistrationPatch, TechfestRegistrationWithCount,
};
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::{check_merged, StaffSession};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_registrations).post(register_team))
        .route("/with-counts", get(list_registrations_with_counts))
        .route(
            "/:id",
            get(get_registration).put(update_registration).delete(delete_registration),
        )
        .route("/:id/members", get(list_members))
}

/// Registration fields with the non-leader members alongside
#[derive(Debug, Deserialize)]
pub struct TeamRegistrationRequest {
    #[serde(flatten)]
    pub registration: NewTechfestRegistration,
    #[serde(default)]
    pub members: Vec<MemberDetails>,
}

#[derive(Debug, Serialize)]
pub struct TeamRegistration {
    pub registration: TechfestRegistration,
    pub members: Vec<RegistrationMember>,
}

pub async fn list_registrations(
    State(state): State<AppState>,
    _staff: StaffSession,
) -> Result<Json<Vec<TechfestRegistration>>, ApiError> {
    info!("GET /api/techfest-registrations");
    Ok(Json(state.storage.list_techfest_registrations().await?))
}

pub async fn list_registrations_with_counts(
    State(state): State<AppState>,
    _staff: StaffSession,
) -> Result<Json<Vec<TechfestRegistrationWithCount>>, ApiError> {
    info!("GET /api/techfest-registrations/with-counts");
    Ok(Json(state.storage.list_techfest_registrations_with_team_counts().await?))
}

pub async fn get_registration(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<Json<TechfestRegistration>, ApiError> {
    info!("GET /api/techfest-registrations/{}", id);
    Ok(Json(
        state
            .storage
            .get_techfest_registration(&id)
            .await
            .or_not_found("Registration")?,
    ))
}

pub async fn register_team(
    State(state): State<AppState>,
    Json(request): Json<TeamRegistrationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        "POST /api/techfest-registrations - team: {}, technofest: {}",
        request.registration.team_name, request.registration.technofest_id
    );
    let (registration, members) = state
        .techfest_service
        .register_team(request.registration, request.members)
        .await
        .or_not_found("Technofest")?;
    Ok((StatusCode::CREATED, Json(TeamRegistration { registration, members })))
}

pub async fn update_registration(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
    Json(patch): Json<TechfestRegistrationPatch>,
) -> Result<Json<TechfestRegistration>, ApiError> {
    info!("PUT /api/techfest-registrations/{}", id);
    let current = state.storage.get_techfest_registration(&id).await.or_not_found("Registration")?;
    check_merged(current, |record| patch.clone().apply_to(record))?;
    Ok(Json(
        state
            .storage
            .update_techfest_registration(&id, patch)
            .await
            .or_not_found("Registration")?,
    ))
}

/// Also removes the team's member rows
pub async fn delete_registration(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/techfest-registrations/{}", id);
    deleted(state.storage.delete_techfest_registration(&id).await, "Registration")
}

pub async fn list_members(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<Json<Vec<RegistrationMember>>, ApiError> {
    info!("GET /api/techfest-registrations/{}/members", id);
    Ok(Json(state.storage.list_registration_members(&id).await?))
}
