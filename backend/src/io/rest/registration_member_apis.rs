//! # REST API for TechFest Team Members

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::{NewRegistrationMember, RegistrationMember, RegistrationMemberPatch};
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::{check_merged, StaffSession, ValidJson};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route("/bulk", post(bulk_create_members))
        .route("/:id", get(get_member).put(update_member).delete(delete_member))
}

pub async fn list_members(
    State(state): State<AppState>,
    _staff: StaffSession,
) -> Result<Json<Vec<RegistrationMember>>, ApiError> {
    info!("GET /api/registration-members");
    Ok(Json(state.storage.list_all_registration_members().await?))
}

pub async fn get_member(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<Json<RegistrationMember>, ApiError> {
    info!("GET /api/registration-members/{}", id);
    Ok(Json(
        state
            .storage
            .get_registration_member(&id)
            .await
            .or_not_found("Team member")?,
    ))
}

pub async fn create_member(
    State(state): State<AppState>,
    _staff: StaffSession,
    ValidJson(input): ValidJson<NewRegistrationMember>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/registration-members - registration: {}", input.registration_id);
    let member = state.storage.create_registration_member(input).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn bulk_create_members(
    State(state): State<AppState>,
    _staff: StaffSession,
    ValidJson(inputs): ValidJson<Vec<NewRegistrationMember>>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/registration-members/bulk - count: {}", inputs.len());
    let members = state.storage.bulk_create_registration_members(inputs).await?;
    Ok((StatusCode::CREATED, Json(members)))
}

pub async fn update_member(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
    Json(patch): Json<RegistrationMemberPatch>,
) -> Result<Json<RegistrationMember>, ApiError> {
    info!("PUT /api/registration-members/{}", id);
    let current = state.storage.get_registration_member(&id).await.or_not_found("Team member")?;
    check_merged(current, |record| patch.clone().apply_to(record))?;
    Ok(Json(
        state
            .storage
            .update_registration_member(&id, patch)
            .await
            .or_not_found("Team member")?,
    ))
}

pub async fn delete_member(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/registration-members/{}", id);
    deleted(state.storage.delete_registration_member(&id).await, "Team member")
}
