//! # Club Site Backend
//!
//! Everything behind the club website's JSON API.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST routers, extractors)
//!     ↓
//! Domain Layer (sessions, voting, team sign-up, validation)
//!     ↓
//! Storage Layer (in-memory or sqlite, chosen once at startup)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::domain::{AnnouncementService, AuthService, PollService, SessionStore, TechfestService};
use crate::storage::{select_storage, Storage};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub auth_service: AuthService,
    pub poll_service: PollService,
    pub announcement_service: AnnouncementService,
    pub techfest_service: TechfestService,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            auth_service: AuthService::new(storage.clone(), SessionStore::new()),
            poll_service: PollService::new(storage.clone()),
            announcement_service: AnnouncementService::new(storage.clone()),
            techfest_service: TechfestService::new(storage.clone()),
            storage,
        }
    }
}

/// Select and seed storage, then wire up the domain services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up storage");
    let storage = select_storage(config).await?;

    info!("Setting up application state");
    Ok(AppState::new(storage))
}

/// Build the axum router with every API route under `/api`
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("CORS origin {:?} is not a valid header value", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Ok(Router::new()
        .nest("/api", io::rest::api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
