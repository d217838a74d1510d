//! Login, logout and sign-up for admins and community users.

use anyhow::Result;
use serde::Deserialize;
use shared::{NewUser, User, UserRole};
use std::sync::Arc;
use tracing::{info, warn};

use super::session::{Session, SessionStore, SessionSubject};
use super::validation::Validate;
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Account is waiting for approval")]
    NotApproved,
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Session is invalid or expired")]
    InvalidToken,
    #[error("Not allowed")]
    Forbidden,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Self-service sign-up body. Role and approval are not caller-controlled.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUp {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AuthService {
    storage: Arc<dyn Storage>,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>, sessions: SessionStore) -> Self {
        Self { storage, sessions }
    }

    pub async fn login_admin(&self, credentials: &Credentials) -> Result<Session> {
        let admin = self.storage.get_admin_by_username(&credentials.username).await?;
        match admin {
            Some(admin) if admin.password == credentials.password => {
                info!("Admin {} logged in", admin.username);
                Ok(self
                    .sessions
                    .create(SessionSubject::Admin { id: admin.id }, &admin.username)
                    .await)
            }
            _ => {
                warn!("Failed admin login for {}", credentials.username);
                Err(AuthError::InvalidCredentials.into())
            }
        }
    }

    pub async fn login_user(&self, credentials: &Credentials) -> Result<Session> {
        if let Some(user) = self
            .storage
            .authenticate_user(&credentials.username, &credentials.password)
            .await?
        {
            info!("User {} logged in", user.username);
            return Ok(self
                .sessions
                .create(
                    SessionSubject::User {
                        id: user.id,
                        role: user.role,
                    },
                    &user.username,
                )
                .await);
        }

        // Tell a correct-but-unapproved login apart from a wrong password
        let pending = self
            .storage
            .get_user_by_username(&credentials.username)
            .await?
            .is_some_and(|user| user.password == credentials.password && !user.is_approved);
        warn!("Failed user login for {}", credentials.username);
        if pending {
            Err(AuthError::NotApproved.into())
        } else {
            Err(AuthError::InvalidCredentials.into())
        }
    }

    pub async fn logout(&self, token: &str) -> bool {
        self.sessions.revoke(token).await
    }

    /// New accounts start as unapproved plain users
    pub async fn register_user(&self, sign_up: SignUp) -> Result<User> {
        let input = NewUser {
            username: sign_up.username,
            email: sign_up.email,
            password: sign_up.password,
            role: UserRole::User,
            is_approved: false,
        };
        input.validate()?;
        let user = self.storage.create_user(input).await?;
        info!("Registered user {} pending approval", user.username);
        Ok(user)
    }

    /// Look up a token and refresh its subject from the stored account.
    ///
    /// Role and username are re-read on every call, so a demotion or rename
    /// takes effect immediately. A token whose account was deleted or unapproved
    /// is revoked.
    pub async fn resolve(&self, token: &str) -> Result<Session> {
        let mut session = self.sessions.get(token).await.ok_or(AuthError::InvalidToken)?;
        let current = match &session.subject {
            SessionSubject::Admin { id } => self
                .storage
                .get_admin(id)
                .await?
                .map(|admin| (SessionSubject::Admin { id: admin.id }, admin.username)),
            SessionSubject::User { id, .. } => self
                .storage
                .get_user(id)
                .await?
                .filter(|user| user.is_approved)
                .map(|user| {
                    (
                        SessionSubject::User {
                            id: user.id,
                            role: user.role,
                        },
                        user.username,
                    )
                }),
        };

        match current {
            Some((subject, username)) => {
                session.subject = subject;
                session.username = username;
                Ok(session)
            }
            None => {
                warn!("Revoking session of {}: account is gone or unapproved", session.username);
                self.sessions.revoke(token).await;
                Err(AuthError::InvalidToken.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{seed_storage, MemoryStorage};
    use shared::UserPatch;

    async fn service() -> AuthService {
        let storage = MemoryStorage::new();
        seed_storage(&storage).await.unwrap();
        AuthService::new(Arc::new(storage), SessionStore::new())
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_admin_login_and_logout() {
        let auth = service().await;
        let session = auth.login_admin(&credentials("admin", "admin123")).await.unwrap();
        assert!(session.is_admin());
        assert_eq!(auth.resolve(&session.token).await.unwrap(), session);

        assert!(auth.logout(&session.token).await);
        let err = auth.resolve(&session.token).await.unwrap_err();
        assert_eq!(err.downcast_ref::<AuthError>(), Some(&AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_admin_login_rejects_wrong_password() {
        let auth = service().await;
        let err = auth.login_admin(&credentials("admin", "nope")).await.unwrap_err();
        assert_eq!(err.downcast_ref::<AuthError>(), Some(&AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_signup_requires_approval_before_login() {
        let auth = service().await;
        let user = auth
            .register_user(SignUp {
                username: "fresh".to_string(),
                email: "fresh@x.com".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        assert!(!user.is_approved);

        let err = auth.login_user(&credentials("fresh", "pw")).await.unwrap_err();
        assert_eq!(err.downcast_ref::<AuthError>(), Some(&AuthError::NotApproved));

        auth.storage.approve_user(&user.id).await.unwrap();
        let session = auth.login_user(&credentials("fresh", "pw")).await.unwrap();
        assert_eq!(session.user_id(), Some(user.id.as_str()));
        assert!(!session.can_manage_content());
    }

    #[tokio::test]
    async fn test_seeded_coordinator_can_manage_content() {
        let auth = service().await;
        let session = auth
            .login_user(&credentials("coordinator", "coordinator123"))
            .await
            .unwrap();
        assert!(session.can_manage_content());
    }

    #[tokio::test]
    async fn test_resolve_follows_stored_account() {
        let auth = service().await;
        let session = auth
            .login_user(&credentials("coordinator", "coordinator123"))
            .await
            .unwrap();
        let id = session.user_id().unwrap().to_string();

        auth.storage
            .update_user(
                &id,
                UserPatch {
                    username: Some("coord".to_string()),
                    role: Some(UserRole::User),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let refreshed = auth.resolve(&session.token).await.unwrap();
        assert_eq!(refreshed.username, "coord");
        assert!(!refreshed.can_manage_content());

        auth.storage
            .update_user(
                &id,
                UserPatch {
                    is_approved: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let err = auth.resolve(&session.token).await.unwrap_err();
        assert_eq!(err.downcast_ref::<AuthError>(), Some(&AuthError::InvalidToken));
        assert!(!auth.logout(&session.token).await);
    }

    #[tokio::test]
    async fn test_deleted_admin_loses_session() {
        let auth = service().await;
        let session = auth.login_admin(&credentials("admin", "admin123")).await.unwrap();
        auth.storage.delete_admin(session.subject_id()).await.unwrap();

        let err = auth.resolve(&session.token).await.unwrap_err();
        assert_eq!(err.downcast_ref::<AuthError>(), Some(&AuthError::InvalidToken));
    }
}
