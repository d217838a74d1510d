//! # REST API for Team Members

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use shared::{NewTeamMember, TeamMember, TeamMemberPatch};
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::{check_merged, StaffSession, ValidJson};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_team_members).post(create_team_member))
        .route(
            "/:id",
            get(get_team_member).put(update_team_member).delete(delete_team_member),
        )
}

pub async fn list_team_members(State(state): State<AppState>) -> Result<Json<Vec<TeamMember>>, ApiError> {
    info!("GET /api/team");
    Ok(Json(state.storage.list_team_members().await?))
}

pub async fn get_team_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TeamMember>, ApiError> {
    info!("GET /api/team/{}", id);
    Ok(Json(state.storage.get_team_member(&id).await.or_not_found("Team member")?))
}

pub async fn create_team_member(
    State(state): State<AppState>,
    _staff: StaffSession,
    ValidJson(input): ValidJson<NewTeamMember>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/team - name: {}", input.name);
    let member = state.storage.create_team_member(input).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn update_team_member(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
    Json(patch): Json<TeamMemberPatch>,
) -> Result<Json<TeamMember>, ApiError> {
    info!("PUT /api/team/{}", id);
    let current = state.storage.get_team_member(&id).await.or_not_found("Team member")?;
    check_merged(current, |record| patch.clone().apply_to(record, Utc::now()))?;
    Ok(Json(
        state
            .storage
            .update_team_member(&id, patch)
            .await
            .or_not_found("Team member")?,
    ))
}

pub async fn delete_team_member(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/team/{}", id);
    deleted(state.storage.delete_team_member(&id).await, "Team member")
}
