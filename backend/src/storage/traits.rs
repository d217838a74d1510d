//! # Storage Traits
//!
//! One trait per entity family. Both backends implement every trait, and the
//! [`Storage`] supertrait lets callers hold a single `Arc<dyn Storage>` without
//! knowing which backend was selected at startup.
//!
//! Conventions shared by all operations:
//! - lookups by id return `Ok(None)` when the record is absent
//! - updates return `Ok(None)` when the record is absent
//! - deletes return `Ok(true)` only if a record existed and was removed
//! - list operations always return a (possibly empty) `Vec`
//! - inputs are assumed to be validated by the caller

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    AboutContent, AboutContentInput, Admin, AdminPatch, Announcement, AnnouncementPatch,
    AnnouncementReply, Course, CoursePatch, Event, EventPatch, GalleryImage, GalleryImagePatch,
    MemberDetails, NewAdmin, NewAnnouncement, NewAnnouncementReply, NewCourse, NewEvent,
    NewGalleryImage, NewPoll, NewPollResponse, NewRegistration, NewRegistrationMember,
    NewTeamMember, NewTechfestRegistration, NewTechnofest, NewUser, Poll, PollPatch, PollResponse,
    PollWithResponses, Registration, RegistrationMember, RegistrationMemberPatch,
    RegistrationPatch, SiteSetting, TeamMember, TeamMemberPatch, TechfestRegistration,
    TechfestRegistrationPatch, TechfestRegistrationWithCount, Technofest, TechnofestPatch, User,
    UserPatch,
};

/// Inactive events older than this many days are removed by `cleanup_old_events`
pub const EVENT_RETENTION_DAYS: i64 = 30;

/// Storage operations for general-purpose club events
#[async_trait]
pub trait EventStorage: Send + Sync {
    /// List all events ordered by date ascending
    async fn list_events(&self) -> Result<Vec<Event>>;

    async fn get_event(&self, id: &str) -> Result<Option<Event>>;

    async fn create_event(&self, input: NewEvent) -> Result<Event>;

    /// Create an event together with its gallery images in one write.
    /// The `event_id` of every image is replaced with the new event's id.
    async fn create_event_with_images(
        &self,
        input: NewEvent,
        images: Vec<NewGalleryImage>,
    ) -> Result<(Event, Vec<GalleryImage>)>;

    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Option<Event>>;

    async fn delete_event(&self, id: &str) -> Result<bool>;

    /// Delete inactive events dated more than [`EVENT_RETENTION_DAYS`] in the past.
    /// Returns the number of events removed.
    async fn cleanup_old_events(&self) -> Result<u64>;

    /// Clear the featured flag on every featured event.
    /// Returns the number of events changed.
    async fn unfeature_all_events(&self) -> Result<u64>;
}

#[async_trait]
pub trait TeamMemberStorage: Send + Sync {
    /// List team members in the order they were added
    async fn list_team_members(&self) -> Result<Vec<TeamMember>>;

    async fn get_team_member(&self, id: &str) -> Result<Option<TeamMember>>;

    async fn create_team_member(&self, input: NewTeamMember) -> Result<TeamMember>;

    async fn update_team_member(&self, id: &str, patch: TeamMemberPatch) -> Result<Option<TeamMember>>;

    async fn delete_team_member(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait GalleryStorage: Send + Sync {
    /// List all gallery images ordered by display order
    async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>>;

    async fn list_gallery_images_for_event(&self, event_id: &str) -> Result<Vec<GalleryImage>>;

    async fn get_gallery_image(&self, id: &str) -> Result<Option<GalleryImage>>;

    async fn create_gallery_image(&self, input: NewGalleryImage) -> Result<GalleryImage>;

    async fn update_gallery_image(&self, id: &str, patch: GalleryImagePatch) -> Result<Option<GalleryImage>>;

    async fn delete_gallery_image(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait AdminStorage: Send + Sync {
    async fn list_admins(&self) -> Result<Vec<Admin>>;

    async fn get_admin(&self, id: &str) -> Result<Option<Admin>>;

    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>>;

    /// Fails with a conflict if the username or email is taken
    async fn create_admin(&self, input: NewAdmin) -> Result<Admin>;

    async fn update_admin(&self, id: &str, patch: AdminPatch) -> Result<Option<Admin>>;

    async fn delete_admin(&self, id: &str) -> Result<bool>;
}

/// Storage operations for sign-ups to general-purpose events
#[async_trait]
pub trait RegistrationStorage: Send + Sync {
    /// List all registrations, newest first
    async fn list_registrations(&self) -> Result<Vec<Registration>>;

    async fn list_registrations_for_event(&self, event_id: &str) -> Result<Vec<Registration>>;

    async fn get_registration(&self, id: &str) -> Result<Option<Registration>>;

    /// Status defaults to pending when the input leaves it unset
    async fn create_registration(&self, input: NewRegistration) -> Result<Registration>;

    async fn update_registration(&self, id: &str, patch: RegistrationPatch) -> Result<Option<Registration>>;

    async fn delete_registration(&self, id: &str) -> Result<bool>;
}

/// Storage for the about page, one row per section
#[async_trait]
pub trait AboutStorage: Send + Sync {
    async fn list_about_content(&self) -> Result<Vec<AboutContent>>;

    async fn get_about_content(&self, section: &str) -> Result<Option<AboutContent>>;

    /// Insert the section, or overwrite it in place if it already exists
    async fn upsert_about_content(&self, section: &str, input: AboutContentInput) -> Result<AboutContent>;

    async fn delete_about_content(&self, section: &str) -> Result<bool>;
}

#[async_trait]
pub trait UserStorage: Send + Sync {
    /// List users in the order they signed up
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn get_user(&self, id: &str) -> Result<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Fails with a conflict if the username or email is taken
    async fn create_user(&self, input: NewUser) -> Result<User>;

    /// Create several users. Earlier users stay created if a later one fails.
    async fn bulk_create_users(&self, inputs: Vec<NewUser>) -> Result<Vec<User>>;

    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<Option<User>>;

    async fn delete_user(&self, id: &str) -> Result<bool>;

    /// Returns the user only when the password matches exactly and the
    /// account has been approved
    async fn authenticate_user(&self, username: &str, password: &str) -> Result<Option<User>>;

    async fn approve_user(&self, id: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait PollStorage: Send + Sync {
    /// List polls, newest first
    async fn list_polls(&self) -> Result<Vec<Poll>>;

    async fn get_poll(&self, id: &str) -> Result<Option<Poll>>;

    async fn get_poll_with_responses(&self, id: &str) -> Result<Option<PollWithResponses>>;

    async fn create_poll(&self, input: NewPoll) -> Result<Poll>;

    async fn update_poll(&self, id: &str, patch: PollPatch) -> Result<Option<Poll>>;

    /// Deleting a poll removes its responses
    async fn delete_poll(&self, id: &str) -> Result<bool>;

    /// Fails with a missing-parent error if the poll does not exist
    async fn create_poll_response(&self, input: NewPollResponse) -> Result<PollResponse>;

    /// Responses for one poll, oldest first
    async fn list_poll_responses(&self, poll_id: &str) -> Result<Vec<PollResponse>>;

    async fn get_poll_response_for_user(&self, poll_id: &str, user_id: &str) -> Result<Option<PollResponse>>;
}

#[async_trait]
pub trait AnnouncementStorage: Send + Sync {
    /// List announcements, newest first
    async fn list_announcements(&self) -> Result<Vec<Announcement>>;

    async fn get_announcement(&self, id: &str) -> Result<Option<Announcement>>;

    async fn create_announcement(&self, input: NewAnnouncement) -> Result<Announcement>;

    async fn update_announcement(&self, id: &str, patch: AnnouncementPatch) -> Result<Option<Announcement>>;

    /// Deleting an announcement removes its replies
    async fn delete_announcement(&self, id: &str) -> Result<bool>;

    /// Fails with a missing-parent error if the announcement does not exist
    async fn create_announcement_reply(&self, input: NewAnnouncementReply) -> Result<AnnouncementReply>;

    /// Replies to one announcement, oldest first
    async fn list_announcement_replies(&self, announcement_id: &str) -> Result<Vec<AnnouncementReply>>;

    async fn delete_announcement_reply(&self, id: &str) -> Result<bool>;
}

/// Storage for the course library
#[async_trait]
pub trait CourseStorage: Send + Sync {
    /// List courses, newest first
    async fn list_courses(&self) -> Result<Vec<Course>>;

    async fn list_active_courses(&self) -> Result<Vec<Course>>;

    async fn get_course(&self, id: &str) -> Result<Option<Course>>;

    async fn create_course(&self, input: NewCourse) -> Result<Course>;

    async fn update_course(&self, id: &str, patch: CoursePatch) -> Result<Option<Course>>;

    async fn delete_course(&self, id: &str) -> Result<bool>;
}

/// Storage for TechFest competitions
#[async_trait]
pub trait TechfestStorage: Send + Sync {
    /// List competitions by number (unnumbered last), then name
    async fn list_technofests(&self) -> Result<Vec<Technofest>>;

    async fn list_active_technofests(&self) -> Result<Vec<Technofest>>;

    async fn list_technofests_by_category(&self, category: &str) -> Result<Vec<Technofest>>;

    async fn get_technofest(&self, id: &str) -> Result<Option<Technofest>>;

    async fn get_technofest_by_slug(&self, slug: &str) -> Result<Option<Technofest>>;

    /// The id is canonical UUID text. Fails with a conflict if the slug is taken.
    async fn create_technofest(&self, input: NewTechnofest) -> Result<Technofest>;

    async fn update_technofest(&self, id: &str, patch: TechnofestPatch) -> Result<Option<Technofest>>;

    /// Deleting a competition removes its registrations and their members
    async fn delete_technofest(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait TechfestRegistrationStorage: Send + Sync {
    /// List all team registrations, newest first
    async fn list_techfest_registrations(&self) -> Result<Vec<TechfestRegistration>>;

    async fn list_techfest_registrations_for_event(&self, technofest_id: &str) -> Result<Vec<TechfestRegistration>>;

    /// Every registration annotated with its stored member count plus one
    /// for the team leader
    async fn list_techfest_registrations_with_team_counts(&self) -> Result<Vec<TechfestRegistrationWithCount>>;

    async fn get_techfest_registration(&self, id: &str) -> Result<Option<TechfestRegistration>>;

    /// The id is canonical UUID text. Fails with a missing-parent error if the
    /// competition does not exist.
    async fn create_techfest_registration(&self, input: NewTechfestRegistration) -> Result<TechfestRegistration>;

    /// Create a registration and its member rows in one write
    async fn create_techfest_registration_with_members(
        &self,
        input: NewTechfestRegistration,
        members: Vec<MemberDetails>,
    ) -> Result<(TechfestRegistration, Vec<RegistrationMember>)>;

    async fn update_techfest_registration(
        &self,
        id: &str,
        patch: TechfestRegistrationPatch,
    ) -> Result<Option<TechfestRegistration>>;

    /// Deleting a registration removes its members
    async fn delete_techfest_registration(&self, id: &str) -> Result<bool>;
}

/// Storage for the non-leader members of a TechFest team
#[async_trait]
pub trait RegistrationMemberStorage: Send + Sync {
    async fn list_all_registration_members(&self) -> Result<Vec<RegistrationMember>>;

    async fn list_registration_members(&self, registration_id: &str) -> Result<Vec<RegistrationMember>>;

    async fn get_registration_member(&self, id: &str) -> Result<Option<RegistrationMember>>;

    /// Fails with a missing-parent error if the registration does not exist
    async fn create_registration_member(&self, input: NewRegistrationMember) -> Result<RegistrationMember>;

    /// Create several members. No rollback is attempted on partial failure.
    async fn bulk_create_registration_members(
        &self,
        inputs: Vec<NewRegistrationMember>,
    ) -> Result<Vec<RegistrationMember>>;

    async fn update_registration_member(
        &self,
        id: &str,
        patch: RegistrationMemberPatch,
    ) -> Result<Option<RegistrationMember>>;

    async fn delete_registration_member(&self, id: &str) -> Result<bool>;
}

/// Key/value site configuration with upsert semantics
#[async_trait]
pub trait SiteSettingsStorage: Send + Sync {
    async fn get_site_setting(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite the value for `key`
    async fn set_site_setting(&self, key: &str, value: &str) -> Result<SiteSetting>;

    async fn list_site_settings(&self) -> Result<Vec<SiteSetting>>;

    async fn delete_site_setting(&self, key: &str) -> Result<bool>;
}

/// The full storage contract. Implemented automatically for any type that
/// implements every family trait.
pub trait Storage:
    EventStorage
    + TeamMemberStorage
    + GalleryStorage
    + AdminStorage
    + RegistrationStorage
    + AboutStorage
    + UserStorage
    + PollStorage
    + AnnouncementStorage
    + CourseStorage
    + TechfestStorage
    + TechfestRegistrationStorage
    + RegistrationMemberStorage
    + SiteSettingsStorage
{
}

impl<T> Storage for T where
    T: EventStorage
        + TeamMemberStorage
        + GalleryStorage
        + AdminStorage
        + RegistrationStorage
        + AboutStorage
        + UserStorage
        + PollStorage
        + AnnouncementStorage
        + CourseStorage
        + TechfestStorage
        + TechfestRegistrationStorage
        + RegistrationMemberStorage
        + SiteSettingsStorage
{
}
