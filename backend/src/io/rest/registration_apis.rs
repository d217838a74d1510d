//! # REST API for Event Registrations
//!
//! Anyone may sign up for an event; reviewing sign-ups is staff-only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use shared::{NewRegistration, Registration, RegistrationPatch};
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::{check_merged, StaffSession, ValidJson};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_registrations).post(create_registration))
        .route(
            "/:id",
            get(get_registration).put(update_registration).delete(delete_registration),
        )
}

pub async fn list_registrations(
    State(state): State<AppState>,
    _staff: StaffSession,
) -> Result<Json<Vec<Registration>>, ApiError> {
    info!("GET /api/registrations");
    Ok(Json(state.storage.list_registrations().await?))
}

pub async fn get_registration(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<Json<Registration>, ApiError> {
    info!("GET /api/registrations/{}", id);
    Ok(Json(state.storage.get_registration(&id).await.or_not_found("Registration")?))
}

pub async fn create_registration(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<NewRegistration>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/registrations - event: {}", input.event_id);
    let registration = state.storage.create_registration(input).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

pub async fn update_registration(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
    Json(patch): Json<RegistrationPatch>,
) -> Result<Json<Registration>, ApiError> {
    info!("PUT /api/registrations/{}", id);
    let current = state.storage.get_registration(&id).await.or_not_found("Registration")?;
    check_merged(current, |record| patch.clone().apply_to(record))?;
    Ok(Json(
        state
            .storage
            .update_registration(&id, patch)
            .await
            .or_not_found("Registration")?,
    ))
}

pub async fn delete_registration(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/registrations/{}", id);
    deleted(state.storage.delete_registration(&id).await, "Registration")
}
