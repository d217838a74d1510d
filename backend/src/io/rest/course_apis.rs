//! # REST API for the Course Library

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use shared::{Course, CoursePatch, NewCourse};
use tracing::info;

use super::error::{deleted, ApiError, OrNotFound};
use super::extract::{check_merged, StaffSession, ValidJson};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:id", get(get_course).put(update_course).delete(delete_course))
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseFilter {
    #[serde(default)]
    pub active: bool,
}

/// `?active=true` hides retired courses
pub async fn list_courses(
    State(state): State<AppState>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Vec<Course>>, ApiError> {
    info!("GET /api/courses - active only: {}", filter.active);
    let courses = if filter.active {
        state.storage.list_active_courses().await?
    } else {
        state.storage.list_courses().await?
    };
    Ok(Json(courses))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, ApiError> {
    info!("GET /api/courses/{}", id);
    Ok(Json(state.storage.get_course(&id).await.or_not_found("Course")?))
}

pub async fn create_course(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    ValidJson(mut input): ValidJson<NewCourse>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/courses - title: {}", input.title);
    input.created_by = session.subject_id().to_string();
    let course = state.storage.create_course(input).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn update_course(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
    Json(patch): Json<CoursePatch>,
) -> Result<Json<Course>, ApiError> {
    info!("PUT /api/courses/{}", id);
    let current = state.storage.get_course(&id).await.or_not_found("Course")?;
    check_merged(current, |record| patch.clone().apply_to(record, Utc::now()))?;
    Ok(Json(state.storage.update_course(&id, patch).await.or_not_found("Course")?))
}

pub async fn delete_course(
    State(state): State<AppState>,
    _staff: StaffSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /api/courses/{}", id);
    deleted(state.storage.delete_course(&id).await, "Course")
}
