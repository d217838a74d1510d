use anyhow::Result;
use shared::{NewPollResponse, PollResponse};
use std::sync::Arc;
use tracing::info;

use super::validation::ValidationError;
use crate::storage::Storage;

/// Voting on community polls
#[derive(Clone)]
pub struct PollService {
    storage: Arc<dyn Storage>,
}

impl PollService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Record user `user_id`'s vote for option index `option`.
    ///
    /// Returns `Ok(None)` when the poll does not exist. Each user votes at most
    /// once per poll; storage rejects a second vote as a conflict.
    pub async fn vote(&self, poll_id: &str, user_id: &str, option: i32) -> Result<Option<PollResponse>> {
        let Some(poll) = self.storage.get_poll(poll_id).await? else {
            return Ok(None);
        };
        if !poll.is_active {
            return Err(ValidationError::PollClosed.into());
        }
        if usize::try_from(option).map_or(true, |index| index >= poll.options.len()) {
            return Err(ValidationError::OptionOutOfRange {
                option,
                count: poll.options.len(),
            }
            .into());
        }

        let user = self
            .storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| ValidationError::UnknownUser(user_id.to_string()))?;

        let response = self
            .storage
            .create_poll_response(NewPollResponse {
                poll_id: poll.id,
                user_id: user.id,
                username: user.username,
                selected_option: option,
            })
            .await?;
        info!("{} voted {} on poll {}", response.username, option, poll_id);
        Ok(Some(response))
    }
}
