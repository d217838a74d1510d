//! Baseline records so a cold store has something to show.
//!
//! Seeding goes through the storage traits, so both backends get identical
//! data. Each family is seeded only while it is empty, which makes
//! [`seed_storage`] safe to call on every startup.

use anyhow::Result;
use chrono::Duration;
use shared::{
    AboutContentInput, NewAdmin, NewAnnouncement, NewEvent, NewGalleryImage, NewPoll,
    NewTechnofest, NewUser, UserRole,
};
use tracing::info;

use super::timestamp_now;
use super::traits::Storage;

pub const BACKGROUND_SCENE_KEY: &str = "backgroundSceneUrl";

const DEFAULT_BACKGROUND_SCENE_URL: &str = "https://prod.spline.design/club-hero/scene.splinecode";

/// Populate every empty entity family with its baseline records
pub async fn seed_storage<S: Storage + ?Sized>(storage: &S) -> Result<()> {
    if storage.list_admins().await?.is_empty() {
        storage
            .create_admin(NewAdmin {
                username: "admin".to_string(),
                password: "admin123".to_string(),
                email: "admin@club.local".to_string(),
            })
            .await?;
        info!("Seeded default admin");
    }

    if storage.get_about_content("hero").await?.is_none() {
        storage
            .upsert_about_content(
                "hero",
                AboutContentInput {
                    title: "Build, break, learn".to_string(),
                    content: "We are a student-run club for people who like making things with code and hardware."
                        .to_string(),
                    image_url: None,
                },
            )
            .await?;
        info!("Seeded about page hero section");
    }

    if storage.list_users().await?.is_empty() {
        let seeded = storage
            .bulk_create_users(vec![
                seed_user("member", UserRole::User),
                seed_user("coordinator", UserRole::Coordinator),
                seed_user("superadmin", UserRole::SuperAdmin),
            ])
            .await?;
        info!("Seeded {} users", seeded.len());
    }

    if storage.list_events().await?.is_empty() {
        let now = timestamp_now();
        let (workshop, images) = storage
            .create_event_with_images(
                NewEvent {
                    title: "Intro to Embedded Rust".to_string(),
                    description: "Blink an LED, then read a sensor, on a microcontroller you keep.".to_string(),
                    date: now + Duration::days(14),
                    location: "Electronics Lab".to_string(),
                    tags: vec!["workshop".to_string(), "rust".to_string()],
                    image_url: None,
                    featured: true,
                    is_active: true,
                    current_participants: 0,
                },
                vec![
                    NewGalleryImage {
                        title: "Last year's workshop".to_string(),
                        image_url: "/images/gallery/workshop-1.jpg".to_string(),
                        description: Some("Soldering station".to_string()),
                        is_main_image: true,
                        display_order: 0,
                        ..Default::default()
                    },
                    NewGalleryImage {
                        title: "Demo table".to_string(),
                        image_url: "/images/gallery/workshop-2.jpg".to_string(),
                        description: None,
                        is_main_image: false,
                        display_order: 1,
                        ..Default::default()
                    },
                ],
            )
            .await?;
        storage
            .create_event(NewEvent {
                title: "Open Project Night".to_string(),
                description: "Bring whatever you are working on.".to_string(),
                date: now + Duration::days(30),
                location: "Room 204".to_string(),
                tags: vec!["social".to_string()],
                image_url: None,
                featured: false,
                is_active: true,
                current_participants: 0,
            })
            .await?;
        info!("Seeded 2 events and {} gallery images for {}", images.len(), workshop.title);
    }

    let author = content_author(storage).await?;

    if storage.list_polls().await?.is_empty() {
        storage
            .create_poll(NewPoll {
                title: "Which workshop should we run next?".to_string(),
                description: None,
                options: vec![
                    "Web backends".to_string(),
                    "PCB design".to_string(),
                    "Game jams".to_string(),
                ],
                created_by: author.clone(),
                is_active: true,
            })
            .await?;
        info!("Seeded default poll");
    }

    if storage.list_announcements().await?.is_empty() {
        storage
            .create_announcement(NewAnnouncement {
                title: "Welcome to the community hub".to_string(),
                content: "Polls, announcements and the course library now live here.".to_string(),
                created_by: author,
                is_important: true,
            })
            .await?;
        info!("Seeded default announcement");
    }

    if storage.list_technofests().await?.is_empty() {
        storage
            .create_technofest(NewTechnofest {
                slug: Some("code-sprint".to_string()),
                name: "Code Sprint".to_string(),
                number: Some(1),
                category: "coding".to_string(),
                short_description: "Three hours, five problems".to_string(),
                description: "A timed competitive programming round for teams.".to_string(),
                rules: vec![
                    "Any language is allowed".to_string(),
                    "No internet access during the round".to_string(),
                ],
                youtube_url: None,
                team_min: 1,
                team_max: 3,
                spline_right_url: None,
                is_active: true,
            })
            .await?;
        info!("Seeded default technofest");
    }

    if storage.get_site_setting(BACKGROUND_SCENE_KEY).await?.is_none() {
        storage
            .set_site_setting(BACKGROUND_SCENE_KEY, DEFAULT_BACKGROUND_SCENE_URL)
            .await?;
        info!("Seeded site setting {}", BACKGROUND_SCENE_KEY);
    }

    Ok(())
}

fn seed_user(username: &str, role: UserRole) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{}@club.local", username),
        password: format!("{}123", username),
        role,
        is_approved: true,
    }
}

/// Id of the user seeded polls and announcements are attributed to
async fn content_author<S: Storage + ?Sized>(storage: &S) -> Result<String> {
    let users = storage.list_users().await?;
    let author = users
        .iter()
        .find(|user| user.role.can_manage_content())
        .or_else(|| users.first())
        .map(|user| user.id.clone())
        .unwrap_or_else(|| "system".to_string());
    Ok(author)
}
