//! # SQLite Storage Module
//!
//! Relational backend built on sqlx. Referential cascades come from the schema's
//! foreign keys (`ON DELETE CASCADE`); multi-step writes run in one transaction.
//!
//! ## Components
//!
//! - **connection.rs** - pool setup and schema
//! - **codec.rs** - column encoding and error mapping
//! - **repositories/** - one file per group of entity families, each implementing
//!   the storage traits for [`SqliteStorage`]

use anyhow::Result;
use sqlx::SqlitePool;

pub mod codec;
pub mod connection;
pub mod repositories;

pub use connection::DbConnection;

/// sqlx-backed implementation of [`Storage`](super::Storage)
#[derive(Clone)]
pub struct SqliteStorage {
    db: DbConnection,
}

impl SqliteStorage {
    /// Connect to `url`, creating the database file and schema when missing
    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self {
            db: DbConnection::new(url).await?,
        })
    }

    #[cfg(test)]
    pub async fn connect_test() -> Result<Self> {
        Ok(Self {
            db: DbConnection::init_test().await?,
        })
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::contract_tests;
    use crate::storage::seed::seed_storage;
    use crate::storage::traits::*;

    #[tokio::test]
    async fn test_sqlite_storage_contract() {
        let storage = SqliteStorage::connect_test().await.expect("Failed to create test database");
        contract_tests::run_all(&storage).await;
    }

    #[tokio::test]
    async fn test_file_database_seeds_once_across_reconnects() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("club.db").display());

        let first = SqliteStorage::connect(&url).await.unwrap();
        seed_storage(&first).await.unwrap();
        let users_after_first = first.list_users().await.unwrap().len();
        let events_after_first = first.list_events().await.unwrap().len();
        first.pool().close().await;

        let second = SqliteStorage::connect(&url).await.unwrap();
        seed_storage(&second).await.unwrap();
        assert_eq!(second.list_users().await.unwrap().len(), users_after_first);
        assert_eq!(second.list_events().await.unwrap().len(), events_after_first);
        assert_eq!(second.list_technofests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_event_date_is_repaired() {
        let storage = SqliteStorage::connect_test().await.unwrap();
        let event = storage
            .create_event(shared::NewEvent {
                title: "Broken".to_string(),
                description: "d".to_string(),
                date: chrono::Utc::now(),
                location: "Hall".to_string(),
                tags: vec![],
                image_url: None,
                featured: false,
                is_active: true,
                current_participants: 0,
            })
            .await
            .unwrap();
        sqlx::query("UPDATE events SET date = 'next tuesday' WHERE id = ?")
            .bind(&event.id)
            .execute(storage.pool())
            .await
            .unwrap();

        let loaded = storage.get_event(&event.id).await.unwrap().unwrap();
        let days_out = (loaded.date - chrono::Utc::now()).num_days();
        assert!((6..=7).contains(&days_out), "unexpected repaired date {}", loaded.date);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_unreadable_date() {
        let storage = SqliteStorage::connect_test().await.unwrap();
        let event = storage
            .create_event(shared::NewEvent {
                title: "Old Talk".to_string(),
                description: "d".to_string(),
                date: chrono::Utc::now() - chrono::Duration::days(90),
                location: "Hall".to_string(),
                tags: vec![],
                image_url: None,
                featured: false,
                is_active: false,
                current_participants: 0,
            })
            .await
            .unwrap();
        sqlx::query("UPDATE events SET date = '1999/01/01' WHERE id = ?")
            .bind(&event.id)
            .execute(storage.pool())
            .await
            .unwrap();

        let updated = storage
            .update_event(
                &event.id,
                shared::EventPatch {
                    title: Some("Renamed Talk".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Renamed Talk");

        let raw: String = sqlx::query_scalar("SELECT date FROM events WHERE id = ?")
            .bind(&event.id)
            .fetch_one(storage.pool())
            .await
            .unwrap();
        assert_eq!(raw, "1999/01/01");

        // The date reads as next week, so the event is not old enough to clean up
        assert_eq!(storage.cleanup_old_events().await.unwrap(), 0);
        assert!(storage.get_event(&event.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_malformed_generated_registration_id_is_rejected() {
        let storage = SqliteStorage::connect_test().await.unwrap();
        let technofest = storage
            .create_technofest(shared::NewTechnofest {
                name: "Hack Night".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        // Simulate a broken id generator
        sqlx::query("DROP TABLE registration_members")
            .execute(storage.pool())
            .await
            .unwrap();
        sqlx::query("DROP TABLE techfest_registrations")
            .execute(storage.pool())
            .await
            .unwrap();
        sqlx::query(
            r#"
            CREATE TABLE techfest_registrations (
                id TEXT PRIMARY KEY DEFAULT (hex(randomblob(4))),
                technofest_id TEXT NOT NULL,
                team_name TEXT NOT NULL,
                team_leader_name TEXT NOT NULL,
                team_leader_email TEXT NOT NULL,
                contact_email TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(storage.pool())
        .await
        .unwrap();

        let err = storage
            .create_techfest_registration(shared::NewTechfestRegistration {
                technofest_id: technofest.id,
                team_name: "Alpha".to_string(),
                team_leader_name: "Ann".to_string(),
                team_leader_email: "ann@x.com".to_string(),
                contact_email: "ann@x.com".to_string(),
                status: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<crate::storage::StorageError>(),
            Some(crate::storage::StorageError::MalformedId { .. })
        ));
    }
}
