use anyhow::Result;
use async_trait::async_trait;
use shared::{
    new_id, AboutContent, AboutContentInput, Announcement, AnnouncementPatch, AnnouncementReply,
    Course, CoursePatch, NewAnnouncement, NewAnnouncementReply, NewCourse, NewPoll,
    NewPollResponse, Poll, PollPatch, PollResponse, PollWithResponses, SiteSetting,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::sqlite::codec::{
    decode_json, decode_timestamp, encode_json, encode_timestamp, map_foreign_key_violation,
    map_unique_violation,
};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::timestamp_now;
use crate::storage::traits::{
    AboutStorage, AnnouncementStorage, CourseStorage, PollStorage, SiteSettingsStorage,
};

const POLL_COLUMNS: &str = "id, title, description, options, created_by, is_active, created_at";

const POLL_RESPONSE_COLUMNS: &str = "id, poll_id, user_id, username, selected_option, created_at";

const ANNOUNCEMENT_COLUMNS: &str = "id, title, content, created_by, is_important, created_at, updated_at";

const REPLY_COLUMNS: &str = "id, announcement_id, user_id, username, content, created_at";

const COURSE_COLUMNS: &str =
    "id, title, description, image_url, course_url, created_by, is_active, created_at, updated_at";

const ABOUT_COLUMNS: &str = "id, section, title, content, image_url, updated_at";

fn poll_from_row(row: &SqliteRow) -> Result<Poll> {
    Ok(Poll {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        options: decode_json(row, "polls", "options")?,
        created_by: row.try_get("created_by")?,
        is_active: row.try_get("is_active")?,
        created_at: decode_timestamp(row, "polls", "created_at")?,
    })
}

fn poll_response_from_row(row: &SqliteRow) -> Result<PollResponse> {
    Ok(PollResponse {
        id: row.try_get("id")?,
        poll_id: row.try_get("poll_id")?,
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        selected_option: row.try_get("selected_option")?,
        created_at: decode_timestamp(row, "poll_responses", "created_at")?,
    })
}

fn announcement_from_row(row: &SqliteRow) -> Result<Announcement> {
    Ok(Announcement {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        created_by: row.try_get("created_by")?,
        is_important: row.try_get("is_important")?,
        created_at: decode_timestamp(row, "announcements", "created_at")?,
        updated_at: decode_timestamp(row, "announcements", "updated_at")?,
    })
}

fn reply_from_row(row: &SqliteRow) -> Result<AnnouncementReply> {
    Ok(AnnouncementReply {
        id: row.try_get("id")?,
        announcement_id: row.try_get("announcement_id")?,
        user_id: row.try_get("user_id")?,
        username: row.try_get("username")?,
        content: row.try_get("content")?,
        created_at: decode_timestamp(row, "announcement_replies", "created_at")?,
    })
}

fn course_from_row(row: &SqliteRow) -> Result<Course> {
    Ok(Course {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        course_url: row.try_get("course_url")?,
        created_by: row.try_get("created_by")?,
        is_active: row.try_get("is_active")?,
        created_at: decode_timestamp(row, "courses", "created_at")?,
        updated_at: decode_timestamp(row, "courses", "updated_at")?,
    })
}

fn about_from_row(row: &SqliteRow) -> Result<AboutContent> {
    Ok(AboutContent {
        id: row.try_get("id")?,
        section: row.try_get("section")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        image_url: row.try_get("image_url")?,
        updated_at: decode_timestamp(row, "about_content", "updated_at")?,
    })
}

fn setting_from_row(row: &SqliteRow) -> Result<SiteSetting> {
    Ok(SiteSetting {
        key: row.try_get("key")?,
        value: row.try_get("value")?,
        updated_at: decode_timestamp(row, "site_settings", "updated_at")?,
    })
}

#[async_trait]
impl PollStorage for SqliteStorage {
    async fn list_polls(&self) -> Result<Vec<Poll>> {
        let rows = sqlx::query(&format!("SELECT {} FROM polls ORDER BY created_at DESC", POLL_COLUMNS))
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(poll_from_row).collect()
    }

    async fn get_poll(&self, id: &str) -> Result<Option<Poll>> {
        let row = sqlx::query(&format!("SELECT {} FROM polls WHERE id = ?", POLL_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(poll_from_row).transpose()
    }

    async fn get_poll_with_responses(&self, id: &str) -> Result<Option<PollWithResponses>> {
        let Some(poll) = self.get_poll(id).await? else {
            return Ok(None);
        };
        let responses = self.list_poll_responses(id).await?;
        Ok(Some(PollWithResponses::new(poll, responses)))
    }

    async fn create_poll(&self, input: NewPoll) -> Result<Poll> {
        let poll = input.into_poll(new_id(), timestamp_now());
        sqlx::query(
            r#"
            INSERT INTO polls (id, title, description, options, created_by, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&poll.id)
        .bind(&poll.title)
        .bind(&poll.description)
        .bind(encode_json(&poll.options)?)
        .bind(&poll.created_by)
        .bind(poll.is_active)
        .bind(encode_timestamp(&poll.created_at))
        .execute(self.pool())
        .await?;
        Ok(poll)
    }

    async fn update_poll(&self, id: &str, patch: PollPatch) -> Result<Option<Poll>> {
        let Some(mut poll) = self.get_poll(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut poll);

        sqlx::query("UPDATE polls SET title = ?, description = ?, is_active = ? WHERE id = ?")
            .bind(&poll.title)
            .bind(&poll.description)
            .bind(poll.is_active)
            .bind(&poll.id)
            .execute(self.pool())
            .await?;

        Ok(Some(poll))
    }

    async fn delete_poll(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM polls WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_poll_response(&self, input: NewPollResponse) -> Result<PollResponse> {
        let response = input.into_poll_response(new_id(), timestamp_now());
        sqlx::query(
            r#"
            INSERT INTO poll_responses (id, poll_id, user_id, username, selected_option, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&response.id)
        .bind(&response.poll_id)
        .bind(&response.user_id)
        .bind(&response.username)
        .bind(response.selected_option)
        .bind(encode_timestamp(&response.created_at))
        .execute(self.pool())
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db_err) if db_err.is_unique_violation()) {
                map_unique_violation(
                    e,
                    "poll response",
                    format!("{} already voted on poll {}", response.username, response.poll_id),
                )
            } else {
                map_foreign_key_violation(e, "poll", &response.poll_id)
            }
        })?;
        Ok(response)
    }

    async fn list_poll_responses(&self, poll_id: &str) -> Result<Vec<PollResponse>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM poll_responses WHERE poll_id = ? ORDER BY created_at ASC",
            POLL_RESPONSE_COLUMNS
        ))
        .bind(poll_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(poll_response_from_row).collect()
    }

    async fn get_poll_response_for_user(&self, poll_id: &str, user_id: &str) -> Result<Option<PollResponse>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM poll_responses WHERE poll_id = ? AND user_id = ? LIMIT 1",
            POLL_RESPONSE_COLUMNS
        ))
        .bind(poll_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(poll_response_from_row).transpose()
    }
}

#[async_trait]
impl AnnouncementStorage for SqliteStorage {
    async fn list_announcements(&self) -> Result<Vec<Announcement>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM announcements ORDER BY created_at DESC",
            ANNOUNCEMENT_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(announcement_from_row).collect()
    }

    async fn get_announcement(&self, id: &str) -> Result<Option<Announcement>> {
        let row = sqlx::query(&format!("SELECT {} FROM announcements WHERE id = ?", ANNOUNCEMENT_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(announcement_from_row).transpose()
    }

    async fn create_announcement(&self, input: NewAnnouncement) -> Result<Announcement> {
        let announcement = input.into_announcement(new_id(), timestamp_now());
        sqlx::query(
            r#"
            INSERT INTO announcements (id, title, content, created_by, is_important, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&announcement.id)
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(&announcement.created_by)
        .bind(announcement.is_important)
        .bind(encode_timestamp(&announcement.created_at))
        .bind(encode_timestamp(&announcement.updated_at))
        .execute(self.pool())
        .await?;
        Ok(announcement)
    }

    async fn update_announcement(&self, id: &str, patch: AnnouncementPatch) -> Result<Option<Announcement>> {
        let Some(mut announcement) = self.get_announcement(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut announcement, timestamp_now());

        sqlx::query("UPDATE announcements SET title = ?, content = ?, is_important = ?, updated_at = ? WHERE id = ?")
            .bind(&announcement.title)
            .bind(&announcement.content)
            .bind(announcement.is_important)
            .bind(encode_timestamp(&announcement.updated_at))
            .bind(&announcement.id)
            .execute(self.pool())
            .await?;

        Ok(Some(announcement))
    }

    async fn delete_announcement(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_announcement_reply(&self, input: NewAnnouncementReply) -> Result<AnnouncementReply> {
        let reply = input.into_reply(new_id(), timestamp_now());
        sqlx::query(
            r#"
            INSERT INTO announcement_replies (id, announcement_id, user_id, username, content, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reply.id)
        .bind(&reply.announcement_id)
        .bind(&reply.user_id)
        .bind(&reply.username)
        .bind(&reply.content)
        .bind(encode_timestamp(&reply.created_at))
        .execute(self.pool())
        .await
        .map_err(|e| map_foreign_key_violation(e, "announcement", &reply.announcement_id))?;
        Ok(reply)
    }

    async fn list_announcement_replies(&self, announcement_id: &str) -> Result<Vec<AnnouncementReply>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM announcement_replies WHERE announcement_id = ? ORDER BY created_at ASC",
            REPLY_COLUMNS
        ))
        .bind(announcement_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(reply_from_row).collect()
    }

    async fn delete_announcement_reply(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM announcement_replies WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CourseStorage for SqliteStorage {
    async fn list_courses(&self) -> Result<Vec<Course>> {
        let rows = sqlx::query(&format!("SELECT {} FROM courses ORDER BY created_at DESC", COURSE_COLUMNS))
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(course_from_row).collect()
    }

    async fn list_active_courses(&self) -> Result<Vec<Course>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM courses WHERE is_active = 1 ORDER BY created_at DESC",
            COURSE_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(course_from_row).collect()
    }

    async fn get_course(&self, id: &str) -> Result<Option<Course>> {
        let row = sqlx::query(&format!("SELECT {} FROM courses WHERE id = ?", COURSE_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(course_from_row).transpose()
    }

    async fn create_course(&self, input: NewCourse) -> Result<Course> {
        let course = input.into_course(new_id(), timestamp_now());
        sqlx::query(
            r#"
            INSERT INTO courses (id, title, description, image_url, course_url, created_by, is_active,
                                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&course.id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.image_url)
        .bind(&course.course_url)
        .bind(&course.created_by)
        .bind(course.is_active)
        .bind(encode_timestamp(&course.created_at))
        .bind(encode_timestamp(&course.updated_at))
        .execute(self.pool())
        .await?;
        Ok(course)
    }

    async fn update_course(&self, id: &str, patch: CoursePatch) -> Result<Option<Course>> {
        let Some(mut course) = self.get_course(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut course, timestamp_now());

        sqlx::query(
            r#"
            UPDATE courses
            SET title = ?, description = ?, image_url = ?, course_url = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.image_url)
        .bind(&course.course_url)
        .bind(course.is_active)
        .bind(encode_timestamp(&course.updated_at))
        .bind(&course.id)
        .execute(self.pool())
        .await?;

        Ok(Some(course))
    }

    async fn delete_course(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AboutStorage for SqliteStorage {
    async fn list_about_content(&self) -> Result<Vec<AboutContent>> {
        let rows = sqlx::query(&format!("SELECT {} FROM about_content ORDER BY section ASC", ABOUT_COLUMNS))
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(about_from_row).collect()
    }

    async fn get_about_content(&self, section: &str) -> Result<Option<AboutContent>> {
        let row = sqlx::query(&format!("SELECT {} FROM about_content WHERE section = ?", ABOUT_COLUMNS))
            .bind(section)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(about_from_row).transpose()
    }

    async fn upsert_about_content(&self, section: &str, input: AboutContentInput) -> Result<AboutContent> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO about_content (id, section, title, content, image_url, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(section) DO UPDATE SET
                title = excluded.title,
                content = excluded.content,
                image_url = excluded.image_url,
                updated_at = excluded.updated_at
            RETURNING {}
            "#,
            ABOUT_COLUMNS
        ))
        .bind(new_id())
        .bind(section)
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.image_url)
        .bind(encode_timestamp(&timestamp_now()))
        .fetch_one(self.pool())
        .await?;

        about_from_row(&row)
    }

    async fn delete_about_content(&self, section: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM about_content WHERE section = ?")
            .bind(section)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SiteSettingsStorage for SqliteStorage {
    async fn get_site_setting(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM site_settings WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(|r| r.try_get::<String, _>("value")).transpose()?)
    }

    async fn set_site_setting(&self, key: &str, value: &str) -> Result<SiteSetting> {
        let row = sqlx::query(
            r#"
            INSERT INTO site_settings (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            RETURNING key, value, updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(encode_timestamp(&timestamp_now()))
        .fetch_one(self.pool())
        .await?;

        setting_from_row(&row)
    }

    async fn list_site_settings(&self) -> Result<Vec<SiteSetting>> {
        let rows = sqlx::query("SELECT key, value, updated_at FROM site_settings ORDER BY key ASC")
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(setting_from_row).collect()
    }

    async fn delete_site_setting(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM site_settings WHERE key = ?")
            .bind(key)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
