//! # In-Memory Storage
//!
//! Process-local, non-persistent backend used when no database is configured.
//! All entity families live in one [`Tables`] value behind a single async
//! `RwLock`, so every operation (cascades included) is atomic with respect to
//! every other. Cloning a `MemoryStorage` shares the same tables.
//!
//! The relational backend gets cascade deletes from its foreign keys; here the
//! same cascades are performed explicitly:
//! - technofest → techfest registrations → registration members
//! - poll → poll responses
//! - announcement → announcement replies

use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use shared::{
    new_id, AboutContent, AboutContentInput, Admin, AdminPatch, Announcement, AnnouncementPatch,
    AnnouncementReply, Course, CoursePatch, Event, EventPatch, GalleryImage, GalleryImagePatch,
    MemberDetails, NewAdmin, NewAnnouncement, NewAnnouncementReply, NewCourse, NewEvent,
    NewGalleryImage, NewPoll, NewPollResponse, NewRegistration, NewRegistrationMember,
    NewTeamMember, NewTechfestRegistration, NewTechnofest, NewUser, Poll, PollPatch, PollResponse,
    PollWithResponses, Registration, RegistrationMember, RegistrationMemberPatch,
    RegistrationPatch, SiteSetting, TeamMember, TeamMemberPatch, TechfestRegistration,
    TechfestRegistrationPatch, TechfestRegistrationWithCount, Technofest, TechnofestPatch, User,
    UserPatch,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::error::StorageError;
use super::timestamp_now;
use super::traits::*;

#[derive(Default)]
struct Tables {
    events: HashMap<String, Event>,
    team_members: HashMap<String, TeamMember>,
    gallery_images: HashMap<String, GalleryImage>,
    admins: HashMap<String, Admin>,
    registrations: HashMap<String, Registration>,
    /// Keyed by section name
    about_content: HashMap<String, AboutContent>,
    users: HashMap<String, User>,
    polls: HashMap<String, Poll>,
    poll_responses: HashMap<String, PollResponse>,
    announcements: HashMap<String, Announcement>,
    announcement_replies: HashMap<String, AnnouncementReply>,
    courses: HashMap<String, Course>,
    technofests: HashMap<String, Technofest>,
    techfest_registrations: HashMap<String, TechfestRegistration>,
    registration_members: HashMap<String, RegistrationMember>,
    /// Keyed by setting key
    site_settings: HashMap<String, SiteSetting>,
}

impl Tables {
    fn ensure_admin_unique(&self, username: &str, email: &str, except_id: Option<&str>) -> Result<()> {
        let taken = self.admins.values().any(|admin| {
            Some(admin.id.as_str()) != except_id && (admin.username == username || admin.email == email)
        });
        if taken {
            return Err(StorageError::conflict(
                "admin",
                format!("username '{}' or email '{}' is already in use", username, email),
            )
            .into());
        }
        Ok(())
    }

    fn ensure_user_unique(&self, username: &str, email: &str, except_id: Option<&str>) -> Result<()> {
        let taken = self.users.values().any(|user| {
            Some(user.id.as_str()) != except_id && (user.username == username || user.email == email)
        });
        if taken {
            return Err(StorageError::conflict(
                "user",
                format!("username '{}' or email '{}' is already in use", username, email),
            )
            .into());
        }
        Ok(())
    }

    fn ensure_slug_unique(&self, slug: Option<&str>, except_id: Option<&str>) -> Result<()> {
        let Some(slug) = slug else {
            return Ok(());
        };
        let taken = self
            .technofests
            .values()
            .any(|t| Some(t.id.as_str()) != except_id && t.slug.as_deref() == Some(slug));
        if taken {
            return Err(StorageError::conflict("technofest", format!("slug '{}' is already in use", slug)).into());
        }
        Ok(())
    }

    fn insert_user(&mut self, input: NewUser) -> Result<User> {
        self.ensure_user_unique(&input.username, &input.email, None)?;
        let user = input.into_user(new_id(), timestamp_now());
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn insert_member(&mut self, input: NewRegistrationMember) -> Result<RegistrationMember> {
        if !self.techfest_registrations.contains_key(&input.registration_id) {
            return Err(StorageError::missing_parent("techfest registration", input.registration_id).into());
        }
        let member = input.into_member(new_id(), timestamp_now());
        self.registration_members.insert(member.id.clone(), member.clone());
        Ok(member)
    }

    fn remove_techfest_registration(&mut self, id: &str) -> bool {
        if self.techfest_registrations.remove(id).is_none() {
            return false;
        }
        self.registration_members.retain(|_, member| member.registration_id != id);
        true
    }
}

/// Map-backed implementation of [`Storage`](super::Storage)
#[derive(Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorage {
    /// Create an empty store. Use [`seed_storage`](super::seed::seed_storage)
    /// to populate the baseline records.
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.created_at.cmp(&b.created_at)));
}

fn sort_gallery(images: &mut [GalleryImage]) {
    images.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

fn sort_technofests(technofests: &mut [Technofest]) {
    // Numbered competitions first, in number order
    technofests.sort_by(|a, b| {
        a.number
            .is_none()
            .cmp(&b.number.is_none())
            .then_with(|| a.number.cmp(&b.number))
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[async_trait]
impl EventStorage for MemoryStorage {
    async fn list_events(&self) -> Result<Vec<Event>> {
        let tables = self.tables.read().await;
        let mut events: Vec<Event> = tables.events.values().cloned().collect();
        sort_events(&mut events);
        Ok(events)
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.tables.read().await.events.get(id).cloned())
    }

    async fn create_event(&self, input: NewEvent) -> Result<Event> {
        let event = input.into_event(new_id(), timestamp_now());
        self.tables.write().await.events.insert(event.id.clone(), event.clone());
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

        let mut tables = self.tables.write().await;
        tables.events.insert(event.id.clone(), event.clone());
        for image in &images {
            tables.gallery_images.insert(image.id.clone(), image.clone());
        }
        Ok((event, images))
    }

    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Option<Event>> {
        let mut tables = self.tables.write().await;
        Ok(tables.events.get_mut(id).map(|event| {
            patch.apply_to(event, timestamp_now());
            event.clone()
        }))
    }

    async fn delete_event(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().await.events.remove(id).is_some())
    }

    async fn cleanup_old_events(&self) -> Result<u64> {
        let cutoff = timestamp_now() - Duration::days(EVENT_RETENTION_DAYS);
        let mut tables = self.tables.write().await;
        let before = tables.events.len();
        tables.events.retain(|_, event| event.is_active || event.date >= cutoff);
        let removed = (before - tables.events.len()) as u64;
        debug!("Removed {} old inactive events", removed);
        Ok(removed)
    }

    async fn unfeature_all_events(&self) -> Result<u64> {
        let now = timestamp_now();
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        for event in tables.events.values_mut().filter(|event| event.featured) {
            event.featured = false;
            event.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }
}

#[async_trait]
impl TeamMemberStorage for MemoryStorage {
    async fn list_team_members(&self) -> Result<Vec<TeamMember>> {
        let tables = self.tables.read().await;
        let mut members: Vec<TeamMember> = tables.team_members.values().cloned().collect();
        members.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(members)
    }

    async fn get_team_member(&self, id: &str) -> Result<Option<TeamMember>> {
        Ok(self.tables.read().await.team_members.get(id).cloned())
    }

    async fn create_team_member(&self, input: NewTeamMember) -> Result<TeamMember> {
        let member = input.into_team_member(new_id(), timestamp_now());
        self.tables
            .write()
            .await
            .team_members
            .insert(member.id.clone(), member.clone());
        Ok(member)
    }

    async fn update_team_member(&self, id: &str, patch: TeamMemberPatch) -> Result<Option<TeamMember>> {
        let mut tables = self.tables.write().await;
        Ok(tables.team_members.get_mut(id).map(|member| {
            patch.apply_to(member, timestamp_now());
            member.clone()
        }))
    }

    async fn delete_team_member(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().await.team_members.remove(id).is_some())
    }
}

#[async_trait]
impl GalleryStorage for MemoryStorage {
    async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>> {
        let tables = self.tables.read().await;
        let mut images: Vec<GalleryImage> = tables.gallery_images.values().cloned().collect();
        sort_gallery(&mut images);
        Ok(images)
    }

    async fn list_gallery_images_for_event(&self, event_id: &str) -> Result<Vec<GalleryImage>> {
        let tables = self.tables.read().await;
        let mut images: Vec<GalleryImage> = tables
            .gallery_images
            .values()
            .filter(|image| image.event_id == event_id)
            .cloned()
            .collect();
        sort_gallery(&mut images);
        Ok(images)
    }

    async fn get_gallery_image(&self, id: &str) -> Result<Option<GalleryImage>> {
        Ok(self.tables.read().await.gallery_images.get(id).cloned())
    }

    async fn create_gallery_image(&self, input: NewGalleryImage) -> Result<GalleryImage> {
        let image = input.into_gallery_image(new_id(), timestamp_now());
        self.tables
            .write()
            .await
            .gallery_images
            .insert(image.id.clone(), image.clone());
        Ok(image)
    }

    async fn update_gallery_image(&self, id: &str, patch: GalleryImagePatch) -> Result<Option<GalleryImage>> {
        let mut tables = self.tables.write().await;
        Ok(tables.gallery_images.get_mut(id).map(|image| {
            patch.apply_to(image);
            image.clone()
        }))
    }

    async fn delete_gallery_image(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().await.gallery_images.remove(id).is_some())
    }
}

#[async_trait]
impl AdminStorage for MemoryStorage {
    async fn list_admins(&self) -> Result<Vec<Admin>> {
        let tables = self.tables.read().await;
        let mut admins: Vec<Admin> = tables.admins.values().cloned().collect();
        admins.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(admins)
    }

    async fn get_admin(&self, id: &str) -> Result<Option<Admin>> {
        Ok(self.tables.read().await.admins.get(id).cloned())
    }

    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let tables = self.tables.read().await;
        Ok(tables.admins.values().find(|admin| admin.username == username).cloned())
    }

    async fn create_admin(&self, input: NewAdmin) -> Result<Admin> {
        let mut tables = self.tables.write().await;
        tables.ensure_admin_unique(&input.username, &input.email, None)?;
        let admin = input.into_admin(new_id(), timestamp_now());
        tables.admins.insert(admin.id.clone(), admin.clone());
        Ok(admin)
    }

    async fn update_admin(&self, id: &str, patch: AdminPatch) -> Result<Option<Admin>> {
        let mut tables = self.tables.write().await;
        let Some(mut admin) = tables.admins.get(id).cloned() else {
            return Ok(None);
        };
        patch.apply_to(&mut admin);
        tables.ensure_admin_unique(&admin.username, &admin.email, Some(id))?;
        tables.admins.insert(admin.id.clone(), admin.clone());
        Ok(Some(admin))
    }

    async fn delete_admin(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().await.admins.remove(id).is_some())
    }
}

#[async_trait]
impl RegistrationStorage for MemoryStorage {
    async fn list_registrations(&self) -> Result<Vec<Registration>> {
        let tables = self.tables.read().await;
        let mut registrations: Vec<Registration> = tables.registrations.values().cloned().collect();
        registrations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(registrations)
    }

    async fn list_registrations_for_event(&self, event_id: &str) -> Result<Vec<Registration>> {
        let tables = self.tables.read().await;
        let mut registrations: Vec<Registration> = tables
            .registrations
            .values()
            .filter(|registration| registration.event_id == event_id)
            .cloned()
            .collect();
        registrations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(registrations)
    }

    async fn get_registration(&self, id: &str) -> Result<Option<Registration>> {
        Ok(self.tables.read().await.registrations.get(id).cloned())
    }

    async fn create_registration(&self, input: NewRegistration) -> Result<Registration> {
        let registration = input.into_registration(new_id(), timestamp_now());
        self.tables
            .write()
            .await
            .registrations
            .insert(registration.id.clone(), registration.clone());
        Ok(registration)
    }

    async fn update_registration(&self, id: &str, patch: RegistrationPatch) -> Result<Option<Registration>> {
        let mut tables = self.tables.write().await;
        Ok(tables.registrations.get_mut(id).map(|registration| {
            patch.apply_to(registration);
            registration.clone()
        }))
    }

    async fn delete_registration(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().await.registrations.remove(id).is_some())
    }
}

#[async_trait]
impl AboutStorage for MemoryStorage {
    async fn list_about_content(&self) -> Result<Vec<AboutContent>> {
        let tables = self.tables.read().await;
        let mut sections: Vec<AboutContent> = tables.about_content.values().cloned().collect();
        sections.sort_by(|a, b| a.section.cmp(&b.section));
        Ok(sections)
    }

    async fn get_about_content(&self, section: &str) -> Result<Option<AboutContent>> {
        Ok(self.tables.read().await.about_content.get(section).cloned())
    }

    async fn upsert_about_content(&self, section: &str, input: AboutContentInput) -> Result<AboutContent> {
        let mut tables = self.tables.write().await;
        let id = tables
            .about_content
            .get(section)
            .map(|existing| existing.id.clone())
            .unwrap_or_else(new_id);
        let content = AboutContent {
            id,
            section: section.to_string(),
            title: input.title,
            content: input.content,
            image_url: input.image_url,
            updated_at: timestamp_now(),
        };
        tables.about_content.insert(section.to_string(), content.clone());
        Ok(content)
    }

    async fn delete_about_content(&self, section: &str) -> Result<bool> {
        Ok(self.tables.write().await.about_content.remove(section).is_some())
    }
}

#[async_trait]
impl UserStorage for MemoryStorage {
    async fn list_users(&self) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|user| user.username == username).cloned())
    }

    async fn create_user(&self, input: NewUser) -> Result<User> {
        self.tables.write().await.insert_user(input)
    }

    async fn bulk_create_users(&self, inputs: Vec<NewUser>) -> Result<Vec<User>> {
        let mut tables = self.tables.write().await;
        inputs.into_iter().map(|input| tables.insert_user(input)).collect()
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<Option<User>> {
        let mut tables = self.tables.write().await;
        let Some(mut user) = tables.users.get(id).cloned() else {
            return Ok(None);
        };
        patch.apply_to(&mut user);
        tables.ensure_user_unique(&user.username, &user.email, Some(id))?;
        tables.users.insert(user.id.clone(), user.clone());
        Ok(Some(user))
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().await.users.remove(id).is_some())
    }

    async fn authenticate_user(&self, username: &str, password: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username && user.password == password && user.is_approved)
            .cloned())
    }

    async fn approve_user(&self, id: &str) -> Result<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(id).map(|user| {
            user.is_approved = true;
            user.clone()
        }))
    }
}

#[async_trait]
impl PollStorage for MemoryStorage {
    async fn list_polls(&self) -> Result<Vec<Poll>> {
        let tables = self.tables.read().await;
        let mut polls: Vec<Poll> = tables.polls.values().cloned().collect();
        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(polls)
    }

    async fn get_poll(&self, id: &str) -> Result<Option<Poll>> {
        Ok(self.tables.read().await.polls.get(id).cloned())
    }

    async fn get_poll_with_responses(&self, id: &str) -> Result<Option<PollWithResponses>> {
        let tables = self.tables.read().await;
        let Some(poll) = tables.polls.get(id).cloned() else {
            return Ok(None);
        };
        let mut responses: Vec<PollResponse> = tables
            .poll_responses
            .values()
            .filter(|response| response.poll_id == id)
            .cloned()
            .collect();
        responses.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(Some(PollWithResponses::new(poll, responses)))
    }

    async fn create_poll(&self, input: NewPoll) -> Result<Poll> {
        let poll = input.into_poll(new_id(), timestamp_now());
        self.tables.write().await.polls.insert(poll.id.clone(), poll.clone());
        Ok(poll)
    }

    async fn update_poll(&self, id: &str, patch: PollPatch) -> Result<Option<Poll>> {
        let mut tables = self.tables.write().await;
        Ok(tables.polls.get_mut(id).map(|poll| {
            patch.apply_to(poll);
            poll.clone()
        }))
    }

    async fn delete_poll(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.polls.remove(id).is_none() {
            return Ok(false);
        }
        tables.poll_responses.retain(|_, response| response.poll_id != id);
        Ok(true)
    }

    async fn create_poll_response(&self, input: NewPollResponse) -> Result<PollResponse> {
        let mut tables = self.tables.write().await;
        if !tables.polls.contains_key(&input.poll_id) {
            return Err(StorageError::missing_parent("poll", input.poll_id).into());
        }
        let already_voted = tables
            .poll_responses
            .values()
            .any(|response| response.poll_id == input.poll_id && response.user_id == input.user_id);
        if already_voted {
            return Err(StorageError::conflict(
                "poll response",
                format!("{} already voted on poll {}", input.username, input.poll_id),
            )
            .into());
        }
        let response = input.into_poll_response(new_id(), timestamp_now());
        tables.poll_responses.insert(response.id.clone(), response.clone());
        Ok(response)
    }

    async fn list_poll_responses(&self, poll_id: &str) -> Result<Vec<PollResponse>> {
        let tables = self.tables.read().await;
        let mut responses: Vec<PollResponse> = tables
            .poll_responses
            .values()
            .filter(|response| response.poll_id == poll_id)
            .cloned()
            .collect();
        responses.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(responses)
    }

    async fn get_poll_response_for_user(&self, poll_id: &str, user_id: &str) -> Result<Option<PollResponse>> {
        let tables = self.tables.read().await;
        Ok(tables
            .poll_responses
            .values()
            .find(|response| response.poll_id == poll_id && response.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl AnnouncementStorage for MemoryStorage {
    async fn list_announcements(&self) -> Result<Vec<Announcement>> {
        let tables = self.tables.read().await;
        let mut announcements: Vec<Announcement> = tables.announcements.values().cloned().collect();
        announcements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(announcements)
    }

    async fn get_announcement(&self, id: &str) -> Result<Option<Announcement>> {
        Ok(self.tables.read().await.announcements.get(id).cloned())
    }

    async fn create_announcement(&self, input: NewAnnouncement) -> Result<Announcement> {
        let announcement = input.into_announcement(new_id(), timestamp_now());
        self.tables
            .write()
            .await
            .announcements
            .insert(announcement.id.clone(), announcement.clone());
        Ok(announcement)
    }

    async fn update_announcement(&self, id: &str, patch: AnnouncementPatch) -> Result<Option<Announcement>> {
        let mut tables = self.tables.write().await;
        Ok(tables.announcements.get_mut(id).map(|announcement| {
            patch.apply_to(announcement, timestamp_now());
            announcement.clone()
        }))
    }

    async fn delete_announcement(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.announcements.remove(id).is_none() {
            return Ok(false);
        }
        tables.announcement_replies.retain(|_, reply| reply.announcement_id != id);
        Ok(true)
    }

    async fn create_announcement_reply(&self, input: NewAnnouncementReply) -> Result<AnnouncementReply> {
        let mut tables = self.tables.write().await;
        if !tables.announcements.contains_key(&input.announcement_id) {
            return Err(StorageError::missing_parent("announcement", input.announcement_id).into());
        }
        let reply = input.into_reply(new_id(), timestamp_now());
        tables.announcement_replies.insert(reply.id.clone(), reply.clone());
        Ok(reply)
    }

    async fn list_announcement_replies(&self, announcement_id: &str) -> Result<Vec<AnnouncementReply>> {
        let tables = self.tables.read().await;
        let mut replies: Vec<AnnouncementReply> = tables
            .announcement_replies
            .values()
            .filter(|reply| reply.announcement_id == announcement_id)
            .cloned()
            .collect();
        replies.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(replies)
    }

    async fn delete_announcement_reply(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().await.announcement_replies.remove(id).is_some())
    }
}

#[async_trait]
impl CourseStorage for MemoryStorage {
    async fn list_courses(&self) -> Result<Vec<Course>> {
        let tables = self.tables.read().await;
        let mut courses: Vec<Course> = tables.courses.values().cloned().collect();
        courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(courses)
    }

    async fn list_active_courses(&self) -> Result<Vec<Course>> {
        let mut courses = self.list_courses().await?;
        courses.retain(|course| course.is_active);
        Ok(courses)
    }

    async fn get_course(&self, id: &str) -> Result<Option<Course>> {
        Ok(self.tables.read().await.courses.get(id).cloned())
    }

    async fn create_course(&self, input: NewCourse) -> Result<Course> {
        let course = input.into_course(new_id(), timestamp_now());
        self.tables.write().await.courses.insert(course.id.clone(), course.clone());
        Ok(course)
    }

    async fn update_course(&self, id: &str, patch: CoursePatch) -> Result<Option<Course>> {
        let mut tables = self.tables.write().await;
        Ok(tables.courses.get_mut(id).map(|course| {
            patch.apply_to(course, timestamp_now());
            course.clone()
        }))
    }

    async fn delete_course(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().await.courses.remove(id).is_some())
    }
}

#[async_trait]
impl TechfestStorage for MemoryStorage {
    async fn list_technofests(&self) -> Result<Vec<Technofest>> {
        let tables = self.tables.read().await;
        let mut technofests: Vec<Technofest> = tables.technofests.values().cloned().collect();
        sort_technofests(&mut technofests);
        Ok(technofests)
    }

    async fn list_active_technofests(&self) -> Result<Vec<Technofest>> {
        let mut technofests = self.list_technofests().await?;
        technofests.retain(|technofest| technofest.is_active);
        Ok(technofests)
    }

    async fn list_technofests_by_category(&self, category: &str) -> Result<Vec<Technofest>> {
        let mut technofests = self.list_technofests().await?;
        technofests.retain(|technofest| technofest.category == category);
        Ok(technofests)
    }

    async fn get_technofest(&self, id: &str) -> Result<Option<Technofest>> {
        Ok(self.tables.read().await.technofests.get(id).cloned())
    }

    async fn get_technofest_by_slug(&self, slug: &str) -> Result<Option<Technofest>> {
        let tables = self.tables.read().await;
        Ok(tables
            .technofests
            .values()
            .find(|technofest| technofest.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn create_technofest(&self, input: NewTechnofest) -> Result<Technofest> {
        let mut tables = self.tables.write().await;
        tables.ensure_slug_unique(input.slug.as_deref(), None)?;
        let technofest = input.into_technofest(new_id(), timestamp_now());
        tables.technofests.insert(technofest.id.clone(), technofest.clone());
        Ok(technofest)
    }

    async fn update_technofest(&self, id: &str, patch: TechnofestPatch) -> Result<Option<Technofest>> {
        let mut tables = self.tables.write().await;
        let Some(mut technofest) = tables.technofests.get(id).cloned() else {
            return Ok(None);
        };
        patch.apply_to(&mut technofest, timestamp_now());
        tables.ensure_slug_unique(technofest.slug.as_deref(), Some(id))?;
        tables.technofests.insert(technofest.id.clone(), technofest.clone());
        Ok(Some(technofest))
    }

    async fn delete_technofest(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.technofests.remove(id).is_none() {
            return Ok(false);
        }
        let registration_ids: Vec<String> = tables
            .techfest_registrations
            .values()
            .filter(|registration| registration.technofest_id == id)
            .map(|registration| registration.id.clone())
            .collect();
        for registration_id in &registration_ids {
            tables.remove_techfest_registration(registration_id);
        }
        debug!(
            "Deleted technofest {} and {} registrations",
            id,
            registration_ids.len()
        );
        Ok(true)
    }
}

#[async_trait]
impl TechfestRegistrationStorage for MemoryStorage {
    async fn list_techfest_registrations(&self) -> Result<Vec<TechfestRegistration>> {
        let tables = self.tables.read().await;
        let mut registrations: Vec<TechfestRegistration> =
            tables.techfest_registrations.values().cloned().collect();
        registrations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(registrations)
    }

    async fn list_techfest_registrations_for_event(&self, technofest_id: &str) -> Result<Vec<TechfestRegistration>> {
        let mut registrations = self.list_techfest_registrations().await?;
        registrations.retain(|registration| registration.technofest_id == technofest_id);
        Ok(registrations)
    }

    async fn list_techfest_registrations_with_team_counts(&self) -> Result<Vec<TechfestRegistrationWithCount>> {
        let tables = self.tables.read().await;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for member in tables.registration_members.values() {
            *counts.entry(member.registration_id.as_str()).or_default() += 1;
        }
        let mut registrations: Vec<TechfestRegistrationWithCount> = tables
            .techfest_registrations
            .values()
            .map(|registration| TechfestRegistrationWithCount {
                member_count: counts.get(registration.id.as_str()).copied().unwrap_or(0) + 1,
                registration: registration.clone(),
            })
            .collect();
        registrations.sort_by(|a, b| b.registration.created_at.cmp(&a.registration.created_at));
        Ok(registrations)
    }

    async fn get_techfest_registration(&self, id: &str) -> Result<Option<TechfestRegistration>> {
        Ok(self.tables.read().await.techfest_registrations.get(id).cloned())
    }

    async fn create_techfest_registration(&self, input: NewTechfestRegistration) -> Result<TechfestRegistration> {
        let mut tables = self.tables.write().await;
        if !tables.technofests.contains_key(&input.technofest_id) {
            return Err(StorageError::missing_parent("technofest", input.technofest_id).into());
        }
        let registration = input.into_registration(new_id(), timestamp_now());
        tables
            .techfest_registrations
            .insert(registration.id.clone(), registration.clone());
        Ok(registration)
    }

    async fn create_techfest_registration_with_members(
        &self,
        input: NewTechfestRegistration,
        members: Vec<MemberDetails>,
    ) -> Result<(TechfestRegistration, Vec<RegistrationMember>)> {
        let mut tables = self.tables.write().await;
        if !tables.technofests.contains_key(&input.technofest_id) {
            return Err(StorageError::missing_parent("technofest", input.technofest_id).into());
        }
        let registration = input.into_registration(new_id(), timestamp_now());
        tables
            .techfest_registrations
            .insert(registration.id.clone(), registration.clone());
        let members = members
            .into_iter()
            .map(|details| tables.insert_member(NewRegistrationMember::for_registration(&registration.id, details)))
            .collect::<Result<Vec<_>>>()?;
        Ok((registration, members))
    }

    async fn update_techfest_registration(
        &self,
        id: &str,
        patch: TechfestRegistrationPatch,
    ) -> Result<Option<TechfestRegistration>> {
        let mut tables = self.tables.write().await;
        Ok(tables.techfest_registrations.get_mut(id).map(|registration| {
            patch.apply_to(registration);
            registration.clone()
        }))
    }

    async fn delete_techfest_registration(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().await.remove_techfest_registration(id))
    }
}

#[async_trait]
impl RegistrationMemberStorage for MemoryStorage {
    async fn list_all_registration_members(&self) -> Result<Vec<RegistrationMember>> {
        let tables = self.tables.read().await;
        let mut members: Vec<RegistrationMember> = tables.registration_members.values().cloned().collect();
        members.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(members)
    }

    async fn list_registration_members(&self, registration_id: &str) -> Result<Vec<RegistrationMember>> {
        let mut members = self.list_all_registration_members().await?;
        members.retain(|member| member.registration_id == registration_id);
        Ok(members)
    }

    async fn get_registration_member(&self, id: &str) -> Result<Option<RegistrationMember>> {
        Ok(self.tables.read().await.registration_members.get(id).cloned())
    }

    async fn create_registration_member(&self, input: NewRegistrationMember) -> Result<RegistrationMember> {
        self.tables.write().await.insert_member(input)
    }

    async fn bulk_create_registration_members(
        &self,
        inputs: Vec<NewRegistrationMember>,
    ) -> Result<Vec<RegistrationMember>> {
        let mut tables = self.tables.write().await;
        inputs.into_iter().map(|input| tables.insert_member(input)).collect()
    }

    async fn update_registration_member(
        &self,
        id: &str,
        patch: RegistrationMemberPatch,
    ) -> Result<Option<RegistrationMember>> {
        let mut tables = self.tables.write().await;
        Ok(tables.registration_members.get_mut(id).map(|member| {
            patch.apply_to(member);
            member.clone()
        }))
    }

    async fn delete_registration_member(&self, id: &str) -> Result<bool> {
        Ok(self.tables.write().await.registration_members.remove(id).is_some())
    }
}

#[async_trait]
impl SiteSettingsStorage for MemoryStorage {
    async fn get_site_setting(&self, key: &str) -> Result<Option<String>> {
        let tables = self.tables.read().await;
        Ok(tables.site_settings.get(key).map(|setting| setting.value.clone()))
    }

    async fn set_site_setting(&self, key: &str, value: &str) -> Result<SiteSetting> {
        let setting = SiteSetting {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: timestamp_now(),
        };
        self.tables
            .write()
            .await
            .site_settings
            .insert(setting.key.clone(), setting.clone());
        Ok(setting)
    }

    async fn list_site_settings(&self) -> Result<Vec<SiteSetting>> {
        let tables = self.tables.read().await;
        let mut settings: Vec<SiteSetting> = tables.site_settings.values().cloned().collect();
        settings.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(settings)
    }

    async fn delete_site_setting(&self, key: &str) -> Result<bool> {
        Ok(self.tables.write().await.site_settings.remove(key).is_some())
    }
}
