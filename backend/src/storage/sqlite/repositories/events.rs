use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use shared::{
    new_id, Event, EventPatch, GalleryImage, GalleryImagePatch, NewEvent, NewGalleryImage,
    NewRegistration, Registration, RegistrationPatch,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteExecutor};
use tracing::{debug, info};

use crate::storage::sqlite::codec::{
    decode_enum, decode_event_date, decode_json, decode_timestamp, encode_json, encode_timestamp,
};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::timestamp_now;
use crate::storage::traits::{EventStorage, GalleryStorage, RegistrationStorage, EVENT_RETENTION_DAYS};

const EVENT_COLUMNS: &str = "id, title, description, date, location, tags, image_url, featured, \
                             is_active, current_participants, created_at, updated_at";

const GALLERY_COLUMNS: &str =
    "id, title, image_url, description, event_id, is_main_image, display_order, created_at";

const REGISTRATION_COLUMNS: &str = "id, event_id, name, email, phone, status, created_at";

fn event_from_row(row: &SqliteRow) -> Result<Event> {
    Ok(Event {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        date: decode_event_date(row)?,
        location: row.try_get("location")?,
        tags: decode_json(row, "events", "tags")?,
        image_url: row.try_get("image_url")?,
        featured: row.try_get("featured")?,
        is_active: row.try_get("is_active")?,
        current_participants: row.try_get("current_participants")?,
        created_at: decode_timestamp(row, "events", "created_at")?,
        updated_at: decode_timestamp(row, "events", "updated_at")?,
    })
}

fn gallery_image_from_row(row: &SqliteRow) -> Result<GalleryImage> {
    Ok(GalleryImage {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        image_url: row.try_get("image_url")?,
        description: row.try_get("description")?,
        event_id: row.try_get("event_id")?,
        is_main_image: row.try_get("is_main_image")?,
        display_order: row.try_get("display_order")?,
        created_at: decode_timestamp(row, "gallery_images", "created_at")?,
    })
}

fn registration_from_row(row: &SqliteRow) -> Result<Registration> {
    Ok(Registration {
        id: row.try_get("id")?,
        event_id: row.try_get("event_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        status: decode_enum(row, "registrations", "status")?,
        created_at: decode_timestamp(row, "registrations", "created_at")?,
    })
}

async fn insert_event<'e>(executor: impl SqliteExecutor<'e>, event: &Event) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO events (id, title, description, date, location, tags, image_url, featured,
                            is_active, current_participants, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&event.id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(encode_timestamp(&event.date))
    .bind(&event.location)
    .bind(encode_json(&event.tags)?)
    .bind(&event.image_url)
    .bind(event.featured)
    .bind(event.is_active)
    .bind(event.current_participants)
    .bind(encode_timestamp(&event.created_at))
    .bind(encode_timestamp(&event.updated_at))
    .execute(executor)
    .await?;
    Ok(())
}

async fn insert_gallery_image<'e>(executor: impl SqliteExecutor<'e>, image: &GalleryImage) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO gallery_images (id, title, image_url, description, event_id, is_main_image,
                                    display_order, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&image.id)
    .bind(&image.title)
    .bind(&image.image_url)
    .bind(&image.description)
    .bind(&image.event_id)
    .bind(image.is_main_image)
    .bind(image.display_order)
    .bind(encode_timestamp(&image.created_at))
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl EventStorage for SqliteStorage {
    async fn list_events(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM events ORDER BY date ASC, created_at ASC",
            EVENT_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(event_from_row).collect()
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let row = sqlx::query(&format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(event_from_row).transpose()
    }

    async fn create_event(&self, input: NewEvent) -> Result<Event> {
        let event = input.into_event(new_id(), timestamp_now());
        insert_event(self.pool(), &event).await?;
        Ok(event)
    }

    async fn create_event_with_images(
        &self,
        input: NewEvent,
        images: Vec<NewGalleryImage>,
    ) -> Result<(Event, Vec<GalleryImage>)> {
        let now = timestamp_now();
        let event = input.into_event(new_id(), now);
        let images: Vec<GalleryImage> = images
            .into_iter()
            .map(|image| {
                NewGalleryImage {
                    event_id: event.id.clone(),
                    ..image
                }
                .into_gallery_image(new_id(), now)
            })
            .collect();

        let mut tx = self.pool().begin().await?;
        insert_event(&mut *tx, &event).await?;
        for image in &images {
            insert_gallery_image(&mut *tx, image).await?;
        }
        tx.commit().await?;

        debug!("Created event {} with {} gallery images", event.id, images.len());
        Ok((event, images))
    }

    /// Only the columns the patch names are written, so a title-only patch
    /// leaves a stored date alone even when it cannot be read back.
    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Option<Event>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE events SET updated_at = ");
        builder.push_bind(encode_timestamp(&timestamp_now()));
        if let Some(title) = patch.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(description) = patch.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(date) = patch.date {
            builder.push(", date = ").push_bind(encode_timestamp(&date));
        }
        if let Some(location) = patch.location {
            builder.push(", location = ").push_bind(location);
        }
        if let Some(tags) = patch.tags {
            builder.push(", tags = ").push_bind(encode_json(&tags)?);
        }
        if let Some(image_url) = patch.image_url {
            builder.push(", image_url = ").push_bind(image_url);
        }
        if let Some(featured) = patch.featured {
            builder.push(", featured = ").push_bind(featured);
        }
        if let Some(is_active) = patch.is_active {
            builder.push(", is_active = ").push_bind(is_active);
        }
        if let Some(current_participants) = patch.current_participants {
            builder.push(", current_participants = ").push_bind(current_participants);
        }
        builder.push(" WHERE id = ").push_bind(id.to_string());

        let result = builder.build().execute(self.pool()).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_event(id).await
    }

    async fn delete_event(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Dates are compared after decoding, so a repaired date counts as upcoming
    async fn cleanup_old_events(&self) -> Result<u64> {
        let cutoff = timestamp_now() - Duration::days(EVENT_RETENTION_DAYS);
        let mut tx = self.pool().begin().await?;
        let rows = sqlx::query("SELECT id, date FROM events WHERE is_active = 0")
            .fetch_all(&mut *tx)
            .await?;

        let mut stale = Vec::new();
        for row in &rows {
            if decode_event_date(row)? < cutoff {
                stale.push(row.try_get::<String, _>("id")?);
            }
        }
        if stale.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM events WHERE id IN (");
        let mut ids = builder.separated(", ");
        for id in stale {
            ids.push_bind(id);
        }
        ids.push_unseparated(")");
        let result = builder.build().execute(&mut *tx).await?;
        tx.commit().await?;

        info!("Removed {} inactive events older than {}", result.rows_affected(), cutoff);
        Ok(result.rows_affected())
    }

    async fn unfeature_all_events(&self) -> Result<u64> {
        let result = sqlx::query("UPDATE events SET featured = 0, updated_at = ? WHERE featured = 1")
            .bind(encode_timestamp(&timestamp_now()))
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl GalleryStorage for SqliteStorage {
    async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM gallery_images ORDER BY display_order ASC, created_at ASC",
            GALLERY_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(gallery_image_from_row).collect()
    }

    async fn list_gallery_images_for_event(&self, event_id: &str) -> Result<Vec<GalleryImage>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM gallery_images WHERE event_id = ? ORDER BY display_order ASC, created_at ASC",
            GALLERY_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(gallery_image_from_row).collect()
    }

    async fn get_gallery_image(&self, id: &str) -> Result<Option<GalleryImage>> {
        let row = sqlx::query(&format!("SELECT {} FROM gallery_images WHERE id = ?", GALLERY_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(gallery_image_from_row).transpose()
    }

    async fn create_gallery_image(&self, input: NewGalleryImage) -> Result<GalleryImage> {
        let image = input.into_gallery_image(new_id(), timestamp_now());
        insert_gallery_image(self.pool(), &image).await?;
        Ok(image)
    }

    async fn update_gallery_image(&self, id: &str, patch: GalleryImagePatch) -> Result<Option<GalleryImage>> {
        let Some(mut image) = self.get_gallery_image(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut image);

        sqlx::query(
            r#"
            UPDATE gallery_images
            SET title = ?, image_url = ?, description = ?, event_id = ?, is_main_image = ?,
                display_order = ?
            WHERE id = ?
            "#,
        )
        .bind(&image.title)
        .bind(&image.image_url)
        .bind(&image.description)
        .bind(&image.event_id)
        .bind(image.is_main_image)
        .bind(image.display_order)
        .bind(&image.id)
        .execute(self.pool())
        .await?;

        Ok(Some(image))
    }

    async fn delete_gallery_image(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM gallery_images WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl RegistrationStorage for SqliteStorage {
    async fn list_registrations(&self) -> Result<Vec<Registration>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM registrations ORDER BY created_at DESC",
            REGISTRATION_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(registration_from_row).collect()
    }

    async fn list_registrations_for_event(&self, event_id: &str) -> Result<Vec<Registration>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM registrations WHERE event_id = ? ORDER BY created_at DESC",
            REGISTRATION_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(registration_from_row).collect()
    }

    async fn get_registration(&self, id: &str) -> Result<Option<Registration>> {
        let row = sqlx::query(&format!("SELECT {} FROM registrations WHERE id = ?", REGISTRATION_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(registration_from_row).transpose()
    }

    async fn create_registration(&self, input: NewRegistration) -> Result<Registration> {
        let registration = input.into_registration(new_id(), timestamp_now());
        sqlx::query(
            r#"
            INSERT INTO registrations (id, event_id, name, email, phone, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&registration.id)
        .bind(&registration.event_id)
        .bind(&registration.name)
        .bind(&registration.email)
        .bind(&registration.phone)
        .bind(registration.status.as_str())
        .bind(encode_timestamp(&registration.created_at))
        .execute(self.pool())
        .await?;
        Ok(registration)
    }

    async fn update_registration(&self, id: &str, patch: RegistrationPatch) -> Result<Option<Registration>> {
        let Some(mut registration) = self.get_registration(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut registration);

        sqlx::query("UPDATE registrations SET name = ?, email = ?, phone = ?, status = ? WHERE id = ?")
            .bind(&registration.name)
            .bind(&registration.email)
            .bind(&registration.phone)
            .bind(registration.status.as_str())
            .bind(&registration.id)
            .execute(self.pool())
            .await?;

        Ok(Some(registration))
    }

    async fn delete_registration(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
