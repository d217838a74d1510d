//! # REST API for Community Polls
//!
//! Staff create and close polls; signed-in community users vote once each.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::{NewPoll, Poll, PollPatch, PollResponse, PollWithResponses};
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::{check_merged, StaffSession, UserSession, ValidJson};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_polls).post(create_poll))
        .route("/:id", get(get_poll).put(update_poll).delete(delete_poll))
        .route("/:id/results", get(get_poll_results))
        .route("/:id/responses", get(list_poll_responses))
        .route("/:id/vote", post(vote))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub selected_option: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResults {
    #[serde(flatten)]
    pub results: PollWithResponses,
    /// Votes per option, indexed like `poll.options`
    pub tally: Vec<usize>,
}

pub async fn list_polls(State(state): State<AppState>) -> Result<Json<Vec<Poll>>, ApiError> {
    info!("GET /api/polls");
    Ok(Json(state.storage.list_polls().await?))
}

pub async fn get_poll(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Poll>, ApiError> {
    info!("GET /api/polls/{}", id);
    Ok(Json(state.storage.get_poll(&id).await.or_not_found("Poll")?))
}

pub async fn get_poll_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PollResults>, ApiError> {
    info!("GET /api/polls/{}/results", id);
    let results = state.storage.get_poll_with_responses(&id).await.or_not_found("Poll")?;
    let tally = results.tally();
    Ok(Json(PollResults { results, tally }))
}

pub async fn list_poll_responses(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<Json<Vec<PollResponse>>, ApiError> {
    info!("GET /api/polls/{}/responses", id);
    Ok(Json(state.storage.list_poll_responses(&id).await?))
}

pub async fn create_poll(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    ValidJson(mut input): ValidJson<NewPoll>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/polls - title: {}", input.title);
    input.created_by = session.subject_id().to_string();
    let poll = state.storage.create_poll(input).await?;
    Ok((StatusCode::CREATED, Json(poll)))
}

pub async fn update_poll(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
    Json(patch): Json<PollPatch>,
) -> Result<Json<Poll>, ApiError> {
    info!("PUT /api/polls/{}", id);
    let current = state.storage.get_poll(&id).await.or_not_found("Poll")?;
    check_merged(current, |record| patch.clone().apply_to(record))?;
    Ok(Json(state.storage.update_poll(&id, patch).await.or_not_found("Poll")?))
}

pub async fn delete_poll(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/polls/{}", id);
    deleted(state.storage.delete_poll(&id).await, "Poll")
}

pub async fn vote(
    State(state): State<AppState>,
    UserSession(session): UserSession,
    Path(id): Path<String>,
    Json(request): Json<VoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/polls/{}/vote - user: {}", id, session.username);
    let response = state
        .poll_service
        .vote(&id, session.subject_id(), request.selected_option)
        .await
        .or_not_found("Poll")?;
    Ok((StatusCode::CREATED, Json(response)))
}
