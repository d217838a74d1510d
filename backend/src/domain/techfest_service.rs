use anyhow::Result;
use shared::{MemberDetails, NewTechfestRegistration, RegistrationMember, TechfestRegistration};
use std::sync::Arc;
use tracing::info;

use super::validation::{team_size, Validate, ValidationError};
use crate::storage::Storage;

/// Team sign-up for TechFest competitions
#[derive(Clone)]
pub struct TechfestService {
    storage: Arc<dyn Storage>,
}

impl TechfestService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Register a team. The leader is part of the registration itself, so the
    /// team size checked against the competition's bounds is `members + 1`.
    ///
    /// Returns `Ok(None)` when the competition does not exist.
    pub async fn register_team(
        &self,
        input: NewTechfestRegistration,
        members: Vec<MemberDetails>,
    ) -> Result<Option<(TechfestRegistration, Vec<RegistrationMember>)>> {
        input.validate()?;
        for member in &members {
            if member.name.trim().is_empty() {
                return Err(ValidationError::Empty("member name").into());
            }
        }

        let Some(technofest) = self.storage.get_technofest(&input.technofest_id).await? else {
            return Ok(None);
        };
        team_size(&technofest, members.len())?;

        let created = self
            .storage
            .create_techfest_registration_with_members(input, members)
            .await?;
        info!(
            "Team {} registered for {} with {} members",
            created.0.team_name,
            technofest.name,
            created.1.len() + 1
        );
        Ok(Some(created))
    }
}
