//! # REST API Interface Layer
//!
//! JSON over HTTP for the club site. One router per entity family, nested
//! under `/api` by [`crate::create_router`]. Handlers stay thin: extract and
//! validate the request, make one storage or domain call, and translate the
//! outcome with [`error::ApiError`].
//!
//! Reads are mostly public. Mutations need a bearer token from `/api/auth`:
//! content management takes an admin, coordinator or super admin session,
//! account management takes an admin or super admin session.

pub mod about_apis;
pub mod admin_apis;
pub mod announcement_apis;
pub mod auth_apis;
pub mod course_apis;
pub mod error;
pub mod event_apis;
pub mod extract;
pub mod gallery_apis;
pub mod poll_apis;
pub mod registration_apis;
pub mod registration_member_apis;
pub mod settings_apis;
pub mod team_apis;
pub mod techfest_registration_apis;
pub mod technofest_apis;
pub mod user_apis;

use axum::Router;

use crate::AppState;

/// Every family's routes, ready to be nested under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_apis::router())
        .nest("/events", event_apis::router())
        .nest("/team", team_apis::router())
        .nest("/gallery", gallery_apis::router())
        .nest("/registrations", registration_apis::router())
        .nest("/about", about_apis::router())
        .nest("/admins", admin_apis::router())
        .nest("/users", user_apis::router())
        .nest("/polls", poll_apis::router())
        .nest("/announcements", announcement_apis::router())
        .nest("/courses", course_apis::router())
        .nest("/technofests", technofest_apis::router())
        .nest("/techfest-registrations", techfest_registration_apis::router())
        .nest("/registration-members", registration_member_apis::router())
        .nest("/settings", settings_apis::router())
}

#[cfg(test)]
mod tests;
