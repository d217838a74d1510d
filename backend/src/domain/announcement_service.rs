use anyhow::Result;
use shared::{AnnouncementReply, NewAnnouncementReply};
use std::sync::Arc;
use tracing::info;

use super::validation::ValidationError;
use crate::storage::Storage;

/// Replies on announcements, attributed to a community user
#[derive(Clone)]
pub struct AnnouncementService {
    storage: Arc<dyn Storage>,
}

impl AnnouncementService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Post a reply as user `user_id`. Returns `Ok(None)` when the announcement
    /// does not exist.
    pub async fn reply(
        &self,
        announcement_id: &str,
        user_id: &str,
        content: &str,
    ) -> Result<Option<AnnouncementReply>> {
        if content.trim().is_empty() {
            return Err(ValidationError::Empty("content").into());
        }
        if self.storage.get_announcement(announcement_id).await?.is_none() {
            return Ok(None);
        }
        let user = self
            .storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| ValidationError::UnknownUser(user_id.to_string()))?;

        let reply = self
            .storage
            .create_announcement_reply(NewAnnouncementReply {
                announcement_id: announcement_id.to_string(),
                user_id: user.id,
                username: user.username,
                content: content.trim().to_string(),
            })
            .await?;
        info!("{} replied to announcement {}", reply.username, announcement_id);
        Ok(Some(reply))
    }
}
