//! # Domain Layer
//!
//! Flows that need more than one storage call, plus session handling and the
//! input rules applied to request bodies. Single-call CRUD goes straight from
//! the REST layer to storage.

pub mod announcement_service;
pub mod auth_service;
pub mod poll_service;
pub mod session;
pub mod techfest_service;
pub mod validation;

pub use announcement_service::AnnouncementService;
pub use auth_service::{AuthError, AuthService, Credentials, SignUp};
pub use poll_service::PollService;
pub use session::{Session, SessionStore, SessionSubject};
pub use techfest_service::TechfestService;
pub use validation::{Validate, ValidationError};
