//! Records exchanged between the storage layer, the REST layer and the web client.
//!
//! Every entity is a flat record keyed by an opaque string id. Creation inputs
//! (`New*`) carry the caller-supplied fields, patches (`*Patch`) carry the fields a
//! caller wants to change. JSON field names are camelCase to match the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Generate a fresh record id (v4 UUID, canonical hyphenated text)
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// True when `id` is a UUID in canonical 8-4-4-4-12 hyphenated form
pub fn is_canonical_uuid(id: &str) -> bool {
    id.len() == 36 && Uuid::try_parse(id).is_ok()
}

fn default_true() -> bool {
    true
}

/// Patch field for a nullable column: absent leaves the value alone, `null`
/// clears it. Pair with `#[serde(default)]` so a missing field stays `None`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Review state of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RegistrationStatus::Pending),
            "approved" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            other => Err(UnknownVariantError::new("registration status", other)),
        }
    }
}

/// Role of a community-hub user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    Coordinator,
    SuperAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Coordinator => "coordinator",
            UserRole::SuperAdmin => "super_admin",
        }
    }

    /// Coordinators and super admins may manage polls, announcements and courses
    pub fn can_manage_content(&self) -> bool {
        matches!(self, UserRole::Coordinator | UserRole::SuperAdmin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "coordinator" => Ok(UserRole::Coordinator),
            "super_admin" => Ok(UserRole::SuperAdmin),
            other => Err(UnknownVariantError::new("user role", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownVariantError {
    kind: &'static str,
    value: String,
}

impl UnknownVariantError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for UnknownVariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariantError {}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub is_active: bool,
    pub current_participants: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub current_participants: i32,
}

impl NewEvent {
    pub fn into_event(self, id: String, now: DateTime<Utc>) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            date: self.date,
            location: self.location,
            tags: self.tags,
            image_url: self.image_url,
            featured: self.featured,
            is_active: self.is_active,
            current_participants: self.current_participants,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
    pub current_participants: Option<i32>,
}

impl EventPatch {
    pub fn apply_to(self, event: &mut Event, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(tags) = self.tags {
            event.tags = tags;
        }
        if let Some(image_url) = self.image_url {
            event.image_url = image_url;
        }
        if let Some(featured) = self.featured {
            event.featured = featured;
        }
        if let Some(is_active) = self.is_active {
            event.is_active = is_active;
        }
        if let Some(current_participants) = self.current_participants {
            event.current_participants = current_participants;
        }
        event.updated_at = now;
    }
}

// ---------------------------------------------------------------------------
// Team members
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub position: String,
    pub description: String,
    pub image_url: Option<String>,
    /// Network name ("github", "linkedin", ...) to profile URL
    pub social_links: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeamMember {
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
}

impl NewTeamMember {
    pub fn into_team_member(self, id: String, now: DateTime<Utc>) -> TeamMember {
        TeamMember {
            id,
            name: self.name,
            position: self.position,
            description: self.description,
            image_url: self.image_url,
            social_links: self.social_links,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMemberPatch {
    pub name: Option<String>,
    pub position: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    pub social_links: Option<BTreeMap<String, String>>,
}

impl TeamMemberPatch {
    pub fn apply_to(self, member: &mut TeamMember, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(position) = self.position {
            member.position = position;
        }
        if let Some(description) = self.description {
            member.description = description;
        }
        if let Some(image_url) = self.image_url {
            member.image_url = image_url;
        }
        if let Some(social_links) = self.social_links {
            member.social_links = social_links;
        }
        member.updated_at = now;
    }
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

/// Gallery image attached to an event. The event reference is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub description: Option<String>,
    pub event_id: String,
    pub is_main_image: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGalleryImage {
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub description: Option<String>,
    pub event_id: String,
    #[serde(default)]
    pub is_main_image: bool,
    #[serde(default)]
    pub display_order: i32,
}

impl NewGalleryImage {
    pub fn into_gallery_image(self, id: String, now: DateTime<Utc>) -> GalleryImage {
        GalleryImage {
            id,
            title: self.title,
            image_url: self.image_url,
            description: self.description,
            event_id: self.event_id,
            is_main_image: self.is_main_image,
            display_order: self.display_order,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryImagePatch {
    pub title: Option<String>,
    pub image_url: Option<String>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    pub event_id: Option<String>,
    pub is_main_image: Option<bool>,
    pub display_order: Option<i32>,
}

impl GalleryImagePatch {
    pub fn apply_to(self, image: &mut GalleryImage) {
        if let Some(title) = self.title {
            image.title = title;
        }
        if let Some(image_url) = self.image_url {
            image.image_url = image_url;
        }
        if let Some(description) = self.description {
            image.description = description;
        }
        if let Some(event_id) = self.event_id {
            image.event_id = event_id;
        }
        if let Some(is_main_image) = self.is_main_image {
            image.is_main_image = is_main_image;
        }
        if let Some(display_order) = self.display_order {
            image.display_order = display_order;
        }
    }
}

// ---------------------------------------------------------------------------
// Admins
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdmin {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl NewAdmin {
    pub fn into_admin(self, id: String, now: DateTime<Utc>) -> Admin {
        Admin {
            id,
            username: self.username,
            password: self.password,
            email: self.email,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminPatch {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl AdminPatch {
    pub fn apply_to(self, admin: &mut Admin) {
        if let Some(username) = self.username {
            admin.username = username;
        }
        if let Some(password) = self.password {
            admin.password = password;
        }
        if let Some(email) = self.email {
            admin.email = email;
        }
    }
}

// ---------------------------------------------------------------------------
// Event registrations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistration {
    pub event_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<RegistrationStatus>,
}

impl NewRegistration {
    pub fn into_registration(self, id: String, now: DateTime<Utc>) -> Registration {
        Registration {
            id,
            event_id: self.event_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            status: self.status.unwrap_or_default(),
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    pub status: Option<RegistrationStatus>,
}

impl RegistrationPatch {
    pub fn apply_to(self, registration: &mut Registration) {
        if let Some(name) = self.name {
            registration.name = name;
        }
        if let Some(email) = self.email {
            registration.email = email;
        }
        if let Some(phone) = self.phone {
            registration.phone = phone;
        }
        if let Some(status) = self.status {
            registration.status = status;
        }
    }
}

// ---------------------------------------------------------------------------
// About page content
// ---------------------------------------------------------------------------

/// One section of the about page, keyed by `section` ("hero", "mission", ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    pub id: String,
    pub section: String,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContentInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: UserRole,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_approved: bool,
}

impl NewUser {
    pub fn into_user(self, id: String, now: DateTime<Utc>) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password: self.password,
            role: self.role,
            is_approved: self.is_approved,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub is_approved: Option<bool>,
}

impl UserPatch {
    pub fn apply_to(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(password) = self.password {
            user.password = password;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(is_approved) = self.is_approved {
            user.is_approved = is_approved;
        }
    }
}

// ---------------------------------------------------------------------------
// Polls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Fixed at creation; responses refer to options by index
    pub options: Vec<String>,
    pub created_by: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPoll {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub options: Vec<String>,
    /// Filled in from the caller's session by the REST layer
    #[serde(default)]
    pub created_by: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewPoll {
    pub fn into_poll(self, id: String, now: DateTime<Utc>) -> Poll {
        Poll {
            id,
            title: self.title,
            description: self.description,
            options: self.options,
            created_by: self.created_by,
            is_active: self.is_active,
            created_at: now,
        }
    }
}

/// Options are deliberately absent: they cannot change once votes exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollPatch {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl PollPatch {
    pub fn apply_to(self, poll: &mut Poll) {
        if let Some(title) = self.title {
            poll.title = title;
        }
        if let Some(description) = self.description {
            poll.description = description;
        }
        if let Some(is_active) = self.is_active {
            poll.is_active = is_active;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub id: String,
    pub poll_id: String,
    pub user_id: String,
    pub username: String,
    pub selected_option: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPollResponse {
    pub poll_id: String,
    pub user_id: String,
    pub username: String,
    pub selected_option: i32,
}

impl NewPollResponse {
    pub fn into_poll_response(self, id: String, now: DateTime<Utc>) -> PollResponse {
        PollResponse {
            id,
            poll_id: self.poll_id,
            user_id: self.user_id,
            username: self.username,
            selected_option: self.selected_option,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollWithResponses {
    pub poll: Poll,
    pub responses: Vec<PollResponse>,
    pub total_votes: usize,
}

impl PollWithResponses {
    pub fn new(poll: Poll, responses: Vec<PollResponse>) -> Self {
        let total_votes = responses.len();
        Self {
            poll,
            responses,
            total_votes,
        }
    }

    /// Vote count per option, indexed like `poll.options`
    pub fn tally(&self) -> Vec<usize> {
        let mut counts = vec![0; self.poll.options.len()];
        for response in &self.responses {
            if let Some(count) = usize::try_from(response.selected_option)
                .ok()
                .and_then(|index| counts.get_mut(index))
            {
                *count += 1;
            }
        }
        counts
    }
}

// ---------------------------------------------------------------------------
// Announcements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_by: String,
    pub is_important: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub is_important: bool,
}

impl NewAnnouncement {
    pub fn into_announcement(self, id: String, now: DateTime<Utc>) -> Announcement {
        Announcement {
            id,
            title: self.title,
            content: self.content,
            created_by: self.created_by,
            is_important: self.is_important,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnouncementPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_important: Option<bool>,
}

impl AnnouncementPatch {
    pub fn apply_to(self, announcement: &mut Announcement, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            announcement.title = title;
        }
        if let Some(content) = self.content {
            announcement.content = content;
        }
        if let Some(is_important) = self.is_important {
            announcement.is_important = is_important;
        }
        announcement.updated_at = now;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementReply {
    pub id: String,
    pub announcement_id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnnouncementReply {
    pub announcement_id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
}

impl NewAnnouncementReply {
    pub fn into_reply(self, id: String, now: DateTime<Utc>) -> AnnouncementReply {
        AnnouncementReply {
            id,
            announcement_id: self.announcement_id,
            user_id: self.user_id,
            username: self.username,
            content: self.content,
            created_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Course library
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub course_url: String,
    pub created_by: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub course_url: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewCourse {
    pub fn into_course(self, id: String, now: DateTime<Utc>) -> Course {
        Course {
            id,
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            course_url: self.course_url,
            created_by: self.created_by,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoursePatch {
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    pub course_url: Option<String>,
    pub is_active: Option<bool>,
}

impl CoursePatch {
    pub fn apply_to(self, course: &mut Course, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            course.title = title;
        }
        if let Some(description) = self.description {
            course.description = description;
        }
        if let Some(image_url) = self.image_url {
            course.image_url = image_url;
        }
        if let Some(course_url) = self.course_url {
            course.course_url = course_url;
        }
        if let Some(is_active) = self.is_active {
            course.is_active = is_active;
        }
        course.updated_at = now;
    }
}

// ---------------------------------------------------------------------------
// TechFest competitions
// ---------------------------------------------------------------------------

/// A TechFest competition, distinct from the general-purpose [`Event`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technofest {
    pub id: String,
    pub slug: Option<String>,
    pub name: String,
    pub number: Option<i32>,
    pub category: String,
    pub short_description: String,
    pub description: String,
    pub rules: Vec<String>,
    pub youtube_url: Option<String>,
    pub team_min: i32,
    pub team_max: i32,
    pub spline_right_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTechnofest {
    #[serde(default)]
    pub slug: Option<String>,
    pub name: String,
    #[serde(default)]
    pub number: Option<i32>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    pub team_min: i32,
    pub team_max: i32,
    #[serde(default)]
    pub spline_right_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Default for NewTechnofest {
    fn default() -> Self {
        Self {
            slug: None,
            name: String::new(),
            number: None,
            category: String::new(),
            short_description: String::new(),
            description: String::new(),
            rules: Vec::new(),
            youtube_url: None,
            team_min: 1,
            team_max: 1,
            spline_right_url: None,
            is_active: true,
        }
    }
}

impl NewTechnofest {
    pub fn into_technofest(self, id: String, now: DateTime<Utc>) -> Technofest {
        Technofest {
            id,
            slug: self.slug,
            name: self.name,
            number: self.number,
            category: self.category,
            short_description: self.short_description,
            description: self.description,
            rules: self.rules,
            youtube_url: self.youtube_url,
            team_min: self.team_min,
            team_max: self.team_max,
            spline_right_url: self.spline_right_url,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnofestPatch {
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub slug: Option<Option<String>>,
    pub name: Option<String>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub number: Option<Option<i32>>,
    pub category: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub rules: Option<Vec<String>>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<Option<String>>,
    pub team_min: Option<i32>,
    pub team_max: Option<i32>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub spline_right_url: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl TechnofestPatch {
    pub fn apply_to(self, technofest: &mut Technofest, now: DateTime<Utc>) {
        if let Some(slug) = self.slug {
            technofest.slug = slug;
        }
        if let Some(name) = self.name {
            technofest.name = name;
        }
        if let Some(number) = self.number {
            technofest.number = number;
        }
        if let Some(category) = self.category {
            technofest.category = category;
        }
        if let Some(short_description) = self.short_description {
            technofest.short_description = short_description;
        }
        if let Some(description) = self.description {
            technofest.description = description;
        }
        if let Some(rules) = self.rules {
            technofest.rules = rules;
        }
        if let Some(youtube_url) = self.youtube_url {
            technofest.youtube_url = youtube_url;
        }
        if let Some(team_min) = self.team_min {
            technofest.team_min = team_min;
        }
        if let Some(team_max) = self.team_max {
            technofest.team_max = team_max;
        }
        if let Some(spline_right_url) = self.spline_right_url {
            technofest.spline_right_url = spline_right_url;
        }
        if let Some(is_active) = self.is_active {
            technofest.is_active = is_active;
        }
        technofest.updated_at = now;
    }
}

/// A team's registration for a TechFest competition. The team leader lives on
/// this record; the other members are [`RegistrationMember`] rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechfestRegistration {
    pub id: String,
    pub technofest_id: String,
    pub team_name: String,
    pub team_leader_name: String,
    pub team_leader_email: String,
    pub contact_email: String,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTechfestRegistration {
    pub technofest_id: String,
    pub team_name: String,
    pub team_leader_name: String,
    pub team_leader_email: String,
    pub contact_email: String,
    #[serde(default)]
    pub status: Option<RegistrationStatus>,
}

impl NewTechfestRegistration {
    pub fn into_registration(self, id: String, now: DateTime<Utc>) -> TechfestRegistration {
        TechfestRegistration {
            id,
            technofest_id: self.technofest_id,
            team_name: self.team_name,
            team_leader_name: self.team_leader_name,
            team_leader_email: self.team_leader_email,
            contact_email: self.contact_email,
            status: self.status.unwrap_or_default(),
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechfestRegistrationPatch {
    pub team_name: Option<String>,
    pub team_leader_name: Option<String>,
    pub team_leader_email: Option<String>,
    pub contact_email: Option<String>,
    pub status: Option<RegistrationStatus>,
}

impl TechfestRegistrationPatch {
    pub fn apply_to(self, registration: &mut TechfestRegistration) {
        if let Some(team_name) = self.team_name {
            registration.team_name = team_name;
        }
        if let Some(team_leader_name) = self.team_leader_name {
            registration.team_leader_name = team_leader_name;
        }
        if let Some(team_leader_email) = self.team_leader_email {
            registration.team_leader_email = team_leader_email;
        }
        if let Some(contact_email) = self.contact_email {
            registration.contact_email = contact_email;
        }
        if let Some(status) = self.status {
            registration.status = status;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechfestRegistrationWithCount {
    #[serde(flatten)]
    pub registration: TechfestRegistration,
    /// Stored members plus the team leader
    pub member_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationMember {
    pub id: String,
    pub registration_id: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistrationMember {
    pub registration_id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl NewRegistrationMember {
    pub fn for_registration(registration_id: &str, details: MemberDetails) -> Self {
        Self {
            registration_id: registration_id.to_string(),
            name: details.name,
            email: details.email,
        }
    }

    pub fn into_member(self, id: String, now: DateTime<Utc>) -> RegistrationMember {
        RegistrationMember {
            id,
            registration_id: self.registration_id,
            name: self.name,
            email: self.email,
            created_at: now,
        }
    }
}

/// A team member submitted alongside a registration that has no id yet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetails {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationMemberPatch {
    pub name: Option<String>,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
}

impl RegistrationMemberPatch {
    pub fn apply_to(self, member: &mut RegistrationMember) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(email) = self.email {
            member.email = email;
        }
    }
}

// ---------------------------------------------------------------------------
// Site settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSetting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
