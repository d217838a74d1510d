//! Input rules enforced before anything reaches storage.
//!
//! Storage trusts its callers, so every creation input that arrives over HTTP is
//! checked here first. Updates are checked by validating the record a patch
//! would produce.

use shared::{
    AboutContentInput, Admin, Announcement, Course, Event, GalleryImage, NewAdmin, NewAnnouncement,
    NewCourse, NewEvent, NewGalleryImage, NewPoll, NewRegistration, NewRegistrationMember,
    NewTeamMember, NewTechfestRegistration, NewTechnofest, NewUser, Poll, Registration,
    RegistrationMember, TeamMember, TechfestRegistration, Technofest, User,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("{0} is not a valid email address")]
    InvalidEmail(&'static str),
    #[error("A poll needs at least two options")]
    TooFewPollOptions,
    #[error("Team size bounds are invalid: min {min}, max {max}")]
    InvalidTeamBounds { min: i32, max: i32 },
    #[error("Team of {size} is outside the allowed range {min}..={max}")]
    TeamSize { size: i32, min: i32, max: i32 },
    #[error("Option {option} does not exist on a poll with {count} options")]
    OptionOutOfRange { option: i32, count: usize },
    #[error("Poll is closed")]
    PollClosed,
    #[error("No user named {0}")]
    UnknownUser(String),
}

/// Checks a request body before it is acted on
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(())
}

fn email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    non_empty(field, value)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidEmail(field)),
    }
}

pub fn team_bounds(min: i32, max: i32) -> Result<(), ValidationError> {
    if min < 1 || min > max {
        return Err(ValidationError::InvalidTeamBounds { min, max });
    }
    Ok(())
}

/// A team's size counts the leader plus every listed member
pub fn team_size(technofest: &Technofest, additional_members: usize) -> Result<(), ValidationError> {
    let size = i32::try_from(additional_members).unwrap_or(i32::MAX).saturating_add(1);
    if size < technofest.team_min || size > technofest.team_max {
        return Err(ValidationError::TeamSize {
            size,
            min: technofest.team_min,
            max: technofest.team_max,
        });
    }
    Ok(())
}

impl Validate for NewEvent {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)?;
        non_empty("description", &self.description)?;
        non_empty("location", &self.location)
    }
}

impl Validate for NewTeamMember {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("name", &self.name)?;
        non_empty("position", &self.position)
    }
}

impl Validate for NewGalleryImage {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)?;
        non_empty("imageUrl", &self.image_url)?;
        non_empty("eventId", &self.event_id)
    }
}

impl Validate for NewAdmin {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("username", &self.username)?;
        non_empty("password", &self.password)?;
        email("email", &self.email)
    }
}

impl Validate for NewRegistration {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("eventId", &self.event_id)?;
        non_empty("name", &self.name)?;
        email("email", &self.email)
    }
}

impl Validate for AboutContentInput {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)?;
        non_empty("content", &self.content)
    }
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("username", &self.username)?;
        non_empty("password", &self.password)?;
        email("email", &self.email)
    }
}

impl Validate for NewPoll {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)?;
        if self.options.len() < 2 {
            return Err(ValidationError::TooFewPollOptions);
        }
        for option in &self.options {
            non_empty("option", option)?;
        }
        Ok(())
    }
}

impl Validate for NewAnnouncement {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)?;
        non_empty("content", &self.content)
    }
}

impl Validate for NewCourse {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)?;
        non_empty("courseUrl", &self.course_url)
    }
}

impl Validate for NewTechnofest {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("name", &self.name)?;
        if let Some(slug) = &self.slug {
            non_empty("slug", slug)?;
        }
        team_bounds(self.team_min, self.team_max)
    }
}

impl Validate for NewTechfestRegistration {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("technofestId", &self.technofest_id)?;
        non_empty("teamName", &self.team_name)?;
        non_empty("teamLeaderName", &self.team_leader_name)?;
        email("teamLeaderEmail", &self.team_leader_email)?;
        email("contactEmail", &self.contact_email)
    }
}

impl Validate for NewRegistrationMember {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("registrationId", &self.registration_id)?;
        non_empty("name", &self.name)
    }
}

// Stored records, checked after a patch is merged in

impl Validate for Event {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)?;
        non_empty("description", &self.description)?;
        non_empty("location", &self.location)
    }
}

impl Validate for TeamMember {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("name", &self.name)?;
        non_empty("position", &self.position)
    }
}

impl Validate for GalleryImage {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)?;
        non_empty("imageUrl", &self.image_url)?;
        non_empty("eventId", &self.event_id)
    }
}

impl Validate for Admin {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("username", &self.username)?;
        non_empty("password", &self.password)?;
        email("email", &self.email)
    }
}

impl Validate for Registration {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("name", &self.name)?;
        email("email", &self.email)
    }
}

impl Validate for User {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("username", &self.username)?;
        non_empty("password", &self.password)?;
        email("email", &self.email)
    }
}

impl Validate for Poll {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)
    }
}

impl Validate for Announcement {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)?;
        non_empty("content", &self.content)
    }
}

impl Validate for Course {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)?;
        non_empty("courseUrl", &self.course_url)
    }
}

impl Validate for Technofest {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("name", &self.name)?;
        if let Some(slug) = &self.slug {
            non_empty("slug", slug)?;
        }
        team_bounds(self.team_min, self.team_max)
    }
}

impl Validate for TechfestRegistration {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("teamName", &self.team_name)?;
        non_empty("teamLeaderName", &self.team_leader_name)?;
        email("teamLeaderEmail", &self.team_leader_email)?;
        email("contactEmail", &self.contact_email)
    }
}

impl Validate for RegistrationMember {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("name", &self.name)
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        self.iter().try_for_each(Validate::validate)
    }
}
