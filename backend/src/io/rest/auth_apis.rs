//! # REST API for Authentication
//!
//! Admin and community-user login, logout, and self-service sign-up.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use super::error::ApiError;
use super::extract::CurrentSession;
use crate::domain::{Credentials, Session, SignUp};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(admin_login))
        .route("/login", post(user_login))
        .route("/logout", post(logout))
        .route("/signup", post(signup))
        .route("/session", get(current_session))
}

pub async fn admin_login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Session>, ApiError> {
    info!("POST /api/auth/admin/login - user: {}", credentials.username);
    let session = state.auth_service.login_admin(&credentials).await?;
    Ok(Json(session))
}

pub async fn user_login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Session>, ApiError> {
    info!("POST /api/auth/login - user: {}", credentials.username);
    let session = state.auth_service.login_user(&credentials).await?;
    Ok(Json(session))
}

pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> StatusCode {
    info!("POST /api/auth/logout - user: {}", session.username);
    state.auth_service.logout(&session.token).await;
    StatusCode::NO_CONTENT
}

/// New accounts wait for approval before they can log in
pub async fn signup(
    State(state): State<AppState>,
    Json(sign_up): Json<SignUp>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/auth/signup - user: {}", sign_up.username);
    let user = state.auth_service.register_user(sign_up).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn current_session(CurrentSession(session): CurrentSession) -> Json<Session> {
    info!("GET /api/auth/session");
    Json(session)
}
