//! In-process session bookkeeping for bearer tokens.
//!
//! Sessions do not survive a restart; clients log in again. A session expires
//! [`SESSION_TTL`] after login.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shared::UserRole;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// How long a token stays valid after login
pub const SESSION_TTL: Duration = Duration::hours(12);

/// Who a session belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SessionSubject {
    Admin { id: String },
    User { id: String, role: UserRole },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub subject: SessionSubject,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at >= ttl
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.subject, SessionSubject::Admin { .. })
    }

    /// Admins, coordinators and super admins may manage site content
    pub fn can_manage_content(&self) -> bool {
        match &self.subject {
            SessionSubject::Admin { .. } => true,
            SessionSubject::User { role, .. } => role.can_manage_content(),
        }
    }

    /// Admins and super admins may manage accounts
    pub fn can_manage_users(&self) -> bool {
        match &self.subject {
            SessionSubject::Admin { .. } => true,
            SessionSubject::User { role, .. } => *role == UserRole::SuperAdmin,
        }
    }

    /// Id of the community user behind this session, if any
    pub fn user_id(&self) -> Option<&str> {
        match &self.subject {
            SessionSubject::User { id, .. } => Some(id),
            SessionSubject::Admin { .. } => None,
        }
    }

    /// Id recorded as `createdBy` on content this session creates
    pub fn subject_id(&self) -> &str {
        match &self.subject {
            SessionSubject::Admin { id } | SessionSubject::User { id, .. } => id,
        }
    }
}

/// Token to session map shared by every request handler
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Open a session and return it with its fresh token. Expired sessions are
    /// dropped on the way.
    pub async fn create(&self, subject: SessionSubject, username: &str) -> Session {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().to_string(),
            subject,
            username: username.to_string(),
            created_at: now,
        };
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, live| !live.is_expired(self.ttl, now));
        if sessions.len() < before {
            debug!("Pruned {} expired sessions", before - sessions.len());
        }
        sessions.insert(session.token.clone(), session.clone());
        session
    }

    pub async fn get(&self, token: &str) -> Option<Session> {
        let session = self.sessions.read().await.get(token).cloned()?;
        if session.is_expired(self.ttl, Utc::now()) {
            self.revoke(token).await;
            return None;
        }
        Some(session)
    }

    /// Returns true if the token was live
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    #[cfg(test)]
    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_get_revoke() {
        let store = SessionStore::new();
        let session = store
            .create(SessionSubject::Admin { id: "a1".to_string() }, "admin")
            .await;
        assert!(shared::is_canonical_uuid(&session.token));
        assert_eq!(store.get(&session.token).await, Some(session.clone()));

        assert!(store.revoke(&session.token).await);
        assert!(!store.revoke(&session.token).await);
        assert!(store.get(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn test_content_permissions_follow_role() {
        let store = SessionStore::new();
        let member = store
            .create(
                SessionSubject::User {
                    id: "u1".to_string(),
                    role: UserRole::User,
                },
                "member",
            )
            .await;
        let coordinator = store
            .create(
                SessionSubject::User {
                    id: "u2".to_string(),
                    role: UserRole::Coordinator,
                },
                "coordinator",
            )
            .await;

        assert!(!member.can_manage_content());
        assert!(coordinator.can_manage_content());
        assert!(!coordinator.is_admin());
        assert!(!coordinator.can_manage_users());
        assert_eq!(member.user_id(), Some("u1"));
    }

    #[tokio::test]
    async fn test_sessions_expire_and_are_pruned() {
        let store = SessionStore::with_ttl(Duration::zero());
        let stale = store
            .create(SessionSubject::Admin { id: "a1".to_string() }, "admin")
            .await;
        assert!(store.get(&stale.token).await.is_none());

        store
            .create(SessionSubject::Admin { id: "a1".to_string() }, "admin")
            .await;
        store
            .create(SessionSubject::Admin { id: "a1".to_string() }, "admin")
            .await;
        // Each create drops whatever had already expired
        assert_eq!(store.session_count().await, 1);
    }

    #[test]
    fn test_session_expiry_boundary() {
        let session = Session {
            token: "t".to_string(),
            subject: SessionSubject::Admin { id: "a1".to_string() },
            username: "admin".to_string(),
            created_at: Utc::now(),
        };
        let ttl = Duration::hours(1);
        assert!(!session.is_expired(ttl, session.created_at + Duration::minutes(59)));
        assert!(session.is_expired(ttl, session.created_at + ttl));
    }
}
