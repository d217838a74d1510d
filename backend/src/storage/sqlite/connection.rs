use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Column default that makes SQLite generate a v4 UUID in canonical text form
const UUID_V4_DEFAULT: &str = "(lower(hex(randomblob(4))) || '-' || lower(hex(randomblob(2))) || '-4' || \
     substr(lower(hex(randomblob(2))), 2) || '-' || substr('89ab', 1 + (abs(random()) % 4), 1) || \
     substr(lower(hex(randomblob(2))), 2) || '-' || lower(hex(randomblob(6))))";

/// DbConnection owns the sqlx pool and the schema
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema
    pub async fn new(url: &str) -> Result<Self> {
        Self::with_pool_options(url, SqlitePoolOptions::new()).await
    }

    /// Initialize a private in-memory database for a single test
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("sqlite:file:memdb_{}?mode=memory&cache=shared", test_id);

        // One connection keeps the shared-cache database alive and free of table locks
        Self::with_pool_options(&db_url, SqlitePoolOptions::new().max_connections(1)).await
    }

    async fn with_pool_options(url: &str, pool_options: SqlitePoolOptions) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        let options = SqliteConnectOptions::from_str(url)?.foreign_keys(true);
        let pool = pool_options.connect_with(options).await?;

        Self::setup_schema(&pool).await?;
        info!("Connected to sqlite database");

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create every table and index. Safe to run against an existing database.
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        for statement in schema_statements() {
            sqlx::query(&statement).execute(pool).await?;
        }
        Ok(())
    }
}

fn schema_statements() -> Vec<String> {
    let mut statements: Vec<String> = [
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            location TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            image_url TEXT,
            featured INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            current_participants INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS team_members (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            position TEXT NOT NULL,
            description TEXT NOT NULL,
            image_url TEXT,
            social_links TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS gallery_images (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            image_url TEXT NOT NULL,
            description TEXT,
            event_id TEXT NOT NULL,
            is_main_image INTEGER NOT NULL DEFAULT 0,
            display_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS registrations (
            id TEXT PRIMARY KEY,
            event_id TEXT NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS about_content (
            id TEXT PRIMARY KEY,
            section TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            image_url TEXT,
            updated_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user',
            is_approved INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS polls (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            options TEXT NOT NULL,
            created_by TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS poll_responses (
            id TEXT PRIMARY KEY,
            poll_id TEXT NOT NULL REFERENCES polls(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            username TEXT NOT NULL,
            selected_option INTEGER NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS announcements (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_by TEXT NOT NULL,
            is_important INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS announcement_replies (
            id TEXT PRIMARY KEY,
            announcement_id TEXT NOT NULL REFERENCES announcements(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            username TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT,
            image_url TEXT,
            course_url TEXT NOT NULL,
            created_by TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS site_settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ]
    .iter()
    .map(|statement| statement.to_string())
    .collect();

    // The techfest chain gets database-generated ids
    statements.push(format!(
        r#"
        CREATE TABLE IF NOT EXISTS technofests (
            id TEXT PRIMARY KEY DEFAULT {uuid},
            slug TEXT UNIQUE,
            name TEXT NOT NULL,
            number INTEGER,
            category TEXT NOT NULL DEFAULT '',
            short_description TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            rules TEXT NOT NULL DEFAULT '[]',
            youtube_url TEXT,
            team_min INTEGER NOT NULL DEFAULT 1,
            team_max INTEGER NOT NULL DEFAULT 1,
            spline_right_url TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        uuid = UUID_V4_DEFAULT
    ));
    statements.push(format!(
        r#"
        CREATE TABLE IF NOT EXISTS techfest_registrations (
            id TEXT PRIMARY KEY DEFAULT {uuid},
            technofest_id TEXT NOT NULL REFERENCES technofests(id) ON DELETE CASCADE,
            team_name TEXT NOT NULL,
            team_leader_name TEXT NOT NULL,
            team_leader_email TEXT NOT NULL,
            contact_email TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL
        )
        "#,
        uuid = UUID_V4_DEFAULT
    ));
    statements.push(format!(
        r#"
        CREATE TABLE IF NOT EXISTS registration_members (
            id TEXT PRIMARY KEY DEFAULT {uuid},
            registration_id TEXT NOT NULL REFERENCES techfest_registrations(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            email TEXT,
            created_at TEXT NOT NULL
        )
        "#,
        uuid = UUID_V4_DEFAULT
    ));

    statements.extend(
        [
            "CREATE INDEX IF NOT EXISTS idx_gallery_images_event_id ON gallery_images(event_id)",
            "CREATE INDEX IF NOT EXISTS idx_registrations_event_id ON registrations(event_id)",
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_poll_responses_poll_user ON poll_responses(poll_id, user_id)",
            "CREATE INDEX IF NOT EXISTS idx_announcement_replies_announcement_id ON announcement_replies(announcement_id)",
            "CREATE INDEX IF NOT EXISTS idx_techfest_registrations_technofest_id ON techfest_registrations(technofest_id)",
            "CREATE INDEX IF NOT EXISTS idx_registration_members_registration_id ON registration_members(registration_id)",
        ]
        .iter()
        .map(|statement| statement.to_string()),
    );

    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_setup_is_idempotent() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        DbConnection::setup_schema(db.pool())
            .await
            .expect("Second schema setup should succeed");
    }

    #[tokio::test]
    async fn test_uuid_default_produces_canonical_text() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let row = sqlx::query(&format!("SELECT {} AS id", UUID_V4_DEFAULT))
            .fetch_one(db.pool())
            .await
            .unwrap();
        let id: String = row.get("id");
        assert!(shared::is_canonical_uuid(&id), "not canonical: {}", id);
        assert_eq!(&id[14..15], "4");
    }
}
