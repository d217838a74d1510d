//! Behaviour every backend must share. Each backend's test module calls
//! [`run_all`] with a fresh, unseeded store.

use chrono::{Duration, Utc};
use shared::*;
use std::time::Duration as StdDuration;

use super::error::StorageError;
use super::seed::seed_storage;
use super::traits::*;

pub async fn run_all<S: Storage>(storage: &S) {
    event_round_trip_and_merge(storage).await;
    event_cleanup_and_unfeature(storage).await;
    event_with_gallery_images(storage).await;
    team_member_round_trip(storage).await;
    admin_uniqueness(storage).await;
    registration_defaults(storage).await;
    about_upsert(storage).await;
    user_authentication_gating(storage).await;
    poll_vote_counts_and_cascade(storage).await;
    announcement_replies_cascade(storage).await;
    course_active_filter(storage).await;
    techfest_team_scenario(storage).await;
    techfest_registration_with_members(storage).await;
    site_settings_upsert(storage).await;
    seed_roles(storage).await;
}

fn storage_error(err: &anyhow::Error) -> &StorageError {
    err.downcast_ref::<StorageError>()
        .unwrap_or_else(|| panic!("expected a StorageError, got {:#}", err))
}

fn sample_event(title: &str) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        description: "An evening of talks".to_string(),
        date: Utc::now() + Duration::days(3),
        location: "Main Hall".to_string(),
        tags: vec!["talks".to_string(), "social".to_string()],
        image_url: Some("/images/talks.png".to_string()),
        featured: false,
        is_active: true,
        current_participants: 4,
    }
}

async fn pause() {
    tokio::time::sleep(StdDuration::from_millis(5)).await;
}

async fn event_round_trip_and_merge<S: Storage>(storage: &S) {
    let input = sample_event("Lightning Talks");
    let created = storage.create_event(input.clone()).await.unwrap();
    assert!(is_canonical_uuid(&created.id));
    assert_eq!(created.created_at, created.updated_at);

    let loaded = storage.get_event(&created.id).await.unwrap().unwrap();
    assert_eq!(loaded.title, input.title);
    assert_eq!(loaded.tags, input.tags);
    assert_eq!(loaded.image_url, input.image_url);
    assert_eq!(loaded.current_participants, 4);
    assert_eq!(loaded.date.timestamp(), input.date.timestamp());
    assert_eq!(loaded.created_at, created.created_at);

    pause().await;
    let updated = storage
        .update_event(
            &created.id,
            EventPatch {
                location: Some("Room 101".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.location, "Room 101");
    assert_eq!(updated.title, loaded.title);
    assert_eq!(updated.tags, loaded.tags);
    assert_eq!(updated.created_at, loaded.created_at);
    assert!(updated.updated_at > loaded.updated_at);
    assert_eq!(storage.get_event(&created.id).await.unwrap().unwrap(), updated);

    let cleared = storage
        .update_event(
            &created.id,
            EventPatch {
                image_url: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.image_url, None);
    assert_eq!(cleared.location, "Room 101");
    assert_eq!(storage.get_event(&created.id).await.unwrap().unwrap().image_url, None);

    assert!(storage.update_event("missing", EventPatch::default()).await.unwrap().is_none());

    assert!(storage.delete_event(&created.id).await.unwrap());
    assert!(!storage.delete_event(&created.id).await.unwrap());
    assert!(storage.get_event(&created.id).await.unwrap().is_none());
}

async fn event_cleanup_and_unfeature<S: Storage>(storage: &S) {
    let long_ago = Utc::now() - Duration::days(40);
    let stale = storage
        .create_event(NewEvent {
            date: long_ago,
            is_active: false,
            ..sample_event("Stale")
        })
        .await
        .unwrap();
    let old_but_active = storage
        .create_event(NewEvent {
            date: long_ago,
            ..sample_event("Old but active")
        })
        .await
        .unwrap();
    let recent_inactive = storage
        .create_event(NewEvent {
            date: Utc::now() - Duration::days(2),
            is_active: false,
            ..sample_event("Recent inactive")
        })
        .await
        .unwrap();

    assert!(storage.cleanup_old_events().await.unwrap() >= 1);
    assert!(storage.get_event(&stale.id).await.unwrap().is_none());
    assert!(storage.get_event(&old_but_active.id).await.unwrap().is_some());
    assert!(storage.get_event(&recent_inactive.id).await.unwrap().is_some());

    storage
        .create_event(NewEvent {
            featured: true,
            ..sample_event("Featured")
        })
        .await
        .unwrap();
    assert!(storage.unfeature_all_events().await.unwrap() >= 1);
    assert!(storage.list_events().await.unwrap().iter().all(|e| !e.featured));
    assert_eq!(storage.unfeature_all_events().await.unwrap(), 0);

    let events = storage.list_events().await.unwrap();
    assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
}

async fn event_with_gallery_images<S: Storage>(storage: &S) {
    let (event, images) = storage
        .create_event_with_images(
            sample_event("Photo Walk"),
            vec![
                NewGalleryImage {
                    title: "Second".to_string(),
                    image_url: "/b.jpg".to_string(),
                    event_id: "ignored".to_string(),
                    display_order: 2,
                    ..Default::default()
                },
                NewGalleryImage {
                    title: "First".to_string(),
                    image_url: "/a.jpg".to_string(),
                    is_main_image: true,
                    display_order: 1,
                    ..Default::default()
                },
            ],
        )
        .await
        .unwrap();
    assert_eq!(images.len(), 2);
    assert!(images.iter().all(|image| image.event_id == event.id));

    let listed = storage.list_gallery_images_for_event(&event.id).await.unwrap();
    let titles: Vec<&str> = listed.iter().map(|image| image.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);

    let patched = storage
        .update_gallery_image(
            &listed[1].id,
            GalleryImagePatch {
                description: Some(Some("Sunset".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(patched.description.as_deref(), Some("Sunset"));
    assert_eq!(patched.image_url, "/b.jpg");

    assert!(storage.delete_gallery_image(&patched.id).await.unwrap());
    assert!(!storage.delete_gallery_image(&patched.id).await.unwrap());
    assert_eq!(storage.list_gallery_images_for_event(&event.id).await.unwrap().len(), 1);
}

async fn team_member_round_trip<S: Storage>(storage: &S) {
    let mut social_links = std::collections::BTreeMap::new();
    social_links.insert("github".to_string(), "https://github.com/ann".to_string());
    let member = storage
        .create_team_member(NewTeamMember {
            name: "Ann".to_string(),
            position: "President".to_string(),
            description: "Runs the club".to_string(),
            image_url: None,
            social_links: social_links.clone(),
        })
        .await
        .unwrap();

    let loaded = storage.get_team_member(&member.id).await.unwrap().unwrap();
    assert_eq!(loaded.social_links, social_links);

    pause().await;
    let updated = storage
        .update_team_member(
            &member.id,
            TeamMemberPatch {
                position: Some("Treasurer".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.position, "Treasurer");
    assert_eq!(updated.social_links, social_links);
    assert!(updated.updated_at > loaded.updated_at);

    assert!(storage.delete_team_member(&member.id).await.unwrap());
    assert!(!storage.delete_team_member(&member.id).await.unwrap());
}

async fn admin_uniqueness<S: Storage>(storage: &S) {
    let admin = storage
        .create_admin(NewAdmin {
            username: "root".to_string(),
            password: "hunter2".to_string(),
            email: "root@club.local".to_string(),
        })
        .await
        .unwrap();

    let by_name = storage.get_admin_by_username("root").await.unwrap().unwrap();
    assert_eq!(by_name.id, admin.id);
    assert_eq!(by_name.password, "hunter2");

    let err = storage
        .create_admin(NewAdmin {
            username: "root".to_string(),
            password: "x".to_string(),
            email: "other@club.local".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(storage_error(&err), StorageError::Conflict { .. }));

    let updated = storage
        .update_admin(
            &admin.id,
            AdminPatch {
                password: Some("correct horse".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.username, "root");
    assert_eq!(updated.password, "correct horse");

    assert!(storage.delete_admin(&admin.id).await.unwrap());
    assert!(storage.get_admin_by_username("root").await.unwrap().is_none());
}

async fn registration_defaults<S: Storage>(storage: &S) {
    let event = storage.create_event(sample_event("Sign-up Night")).await.unwrap();
    let registration = storage
        .create_registration(NewRegistration {
            event_id: event.id.clone(),
            name: "Bo".to_string(),
            email: "bo@x.com".to_string(),
            phone: None,
            status: None,
        })
        .await
        .unwrap();
    assert_eq!(registration.status, RegistrationStatus::Pending);

    let for_event = storage.list_registrations_for_event(&event.id).await.unwrap();
    assert_eq!(for_event.len(), 1);

    let approved = storage
        .update_registration(
            &registration.id,
            RegistrationPatch {
                status: Some(RegistrationStatus::Approved),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approved.status, RegistrationStatus::Approved);
    assert_eq!(approved.email, "bo@x.com");
    assert_eq!(
        storage.get_registration(&registration.id).await.unwrap().unwrap().status,
        RegistrationStatus::Approved
    );

    assert!(storage.delete_registration(&registration.id).await.unwrap());
    assert!(!storage.delete_registration(&registration.id).await.unwrap());
}

async fn about_upsert<S: Storage>(storage: &S) {
    let first = storage
        .upsert_about_content(
            "mission",
            AboutContentInput {
                title: "Mission".to_string(),
                content: "v1".to_string(),
                image_url: None,
            },
        )
        .await
        .unwrap();
    let second = storage
        .upsert_about_content(
            "mission",
            AboutContentInput {
                title: "Our Mission".to_string(),
                content: "v2".to_string(),
                image_url: Some("/m.png".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.content, "v2");

    let sections = storage.list_about_content().await.unwrap();
    assert_eq!(sections.iter().filter(|s| s.section == "mission").count(), 1);

    assert!(storage.delete_about_content("mission").await.unwrap());
    assert!(!storage.delete_about_content("mission").await.unwrap());
    assert!(storage.get_about_content("mission").await.unwrap().is_none());
}

async fn user_authentication_gating<S: Storage>(storage: &S) {
    let user = storage
        .create_user(NewUser {
            username: "newbie".to_string(),
            email: "newbie@x.com".to_string(),
            password: "pw".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(!user.is_approved);
    assert_eq!(user.role, UserRole::User);

    assert!(storage.authenticate_user("newbie", "pw").await.unwrap().is_none());

    let approved = storage.approve_user(&user.id).await.unwrap().unwrap();
    assert!(approved.is_approved);
    assert!(storage.approve_user("missing").await.unwrap().is_none());

    let authenticated = storage.authenticate_user("newbie", "pw").await.unwrap().unwrap();
    assert_eq!(authenticated.id, user.id);
    assert!(storage.authenticate_user("newbie", "PW").await.unwrap().is_none());
    assert!(storage.authenticate_user("nobody", "pw").await.unwrap().is_none());

    let err = storage
        .create_user(NewUser {
            username: "other".to_string(),
            email: "newbie@x.com".to_string(),
            password: "pw".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(storage_error(&err), StorageError::Conflict { .. }));

    let bulk = storage
        .bulk_create_users(vec![
            NewUser {
                username: "bulk1".to_string(),
                email: "bulk1@x.com".to_string(),
                password: "pw".to_string(),
                ..Default::default()
            },
            NewUser {
                username: "bulk2".to_string(),
                email: "bulk2@x.com".to_string(),
                password: "pw".to_string(),
                role: UserRole::Coordinator,
                is_approved: true,
            },
        ])
        .await
        .unwrap();
    assert_eq!(bulk.len(), 2);
    assert_eq!(
        storage.get_user_by_username("bulk2").await.unwrap().unwrap().role,
        UserRole::Coordinator
    );

    let renamed = storage
        .update_user(
            &bulk[0].id,
            UserPatch {
                role: Some(UserRole::SuperAdmin),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.role, UserRole::SuperAdmin);
    assert_eq!(renamed.username, "bulk1");

    for id in [&user.id, &bulk[0].id, &bulk[1].id] {
        assert!(storage.delete_user(id).await.unwrap());
    }
}

async fn poll_vote_counts_and_cascade<S: Storage>(storage: &S) {
    let poll = storage
        .create_poll(NewPoll {
            title: "Snacks?".to_string(),
            description: None,
            options: vec!["Pizza".to_string(), "Samosa".to_string()],
            created_by: "user-1".to_string(),
            is_active: true,
        })
        .await
        .unwrap();

    let empty = storage.get_poll_with_responses(&poll.id).await.unwrap().unwrap();
    assert_eq!(empty.total_votes, 0);
    assert!(empty.responses.is_empty());

    let vote = |user: &str, option: i32| NewPollResponse {
        poll_id: poll.id.clone(),
        user_id: user.to_string(),
        username: format!("name-{}", user),
        selected_option: option,
    };

    storage.create_poll_response(vote("u1", 0)).await.unwrap();
    let one = storage.get_poll_with_responses(&poll.id).await.unwrap().unwrap();
    assert_eq!(one.total_votes, 1);

    storage.create_poll_response(vote("u2", 1)).await.unwrap();
    storage.create_poll_response(vote("u3", 1)).await.unwrap();
    let many = storage.get_poll_with_responses(&poll.id).await.unwrap().unwrap();
    assert_eq!(many.total_votes, 3);
    assert_eq!(many.total_votes, storage.list_poll_responses(&poll.id).await.unwrap().len());
    assert_eq!(many.tally(), vec![1, 2]);

    let err = storage.create_poll_response(vote("u2", 0)).await.unwrap_err();
    assert!(matches!(storage_error(&err), StorageError::Conflict { .. }));
    assert_eq!(storage.list_poll_responses(&poll.id).await.unwrap().len(), 3);

    let mine = storage.get_poll_response_for_user(&poll.id, "u2").await.unwrap().unwrap();
    assert_eq!(mine.selected_option, 1);
    assert!(storage.get_poll_response_for_user(&poll.id, "u9").await.unwrap().is_none());

    let closed = storage
        .update_poll(
            &poll.id,
            PollPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(!closed.is_active);
    assert_eq!(closed.options, poll.options);

    let err = storage
        .create_poll_response(NewPollResponse {
            poll_id: "missing".to_string(),
            ..vote("u1", 0)
        })
        .await
        .unwrap_err();
    assert!(matches!(storage_error(&err), StorageError::MissingParent { .. }));

    assert!(storage.delete_poll(&poll.id).await.unwrap());
    assert!(storage.list_poll_responses(&poll.id).await.unwrap().is_empty());
    assert!(storage.get_poll_with_responses(&poll.id).await.unwrap().is_none());
}

async fn announcement_replies_cascade<S: Storage>(storage: &S) {
    let announcement = storage
        .create_announcement(NewAnnouncement {
            title: "Room change".to_string(),
            content: "We moved to 204".to_string(),
            created_by: "user-1".to_string(),
            is_important: false,
        })
        .await
        .unwrap();

    let reply = |content: &str| NewAnnouncementReply {
        announcement_id: announcement.id.clone(),
        user_id: "u1".to_string(),
        username: "ann".to_string(),
        content: content.to_string(),
    };
    let first = storage.create_announcement_reply(reply("Thanks")).await.unwrap();
    storage.create_announcement_reply(reply("Noted")).await.unwrap();
    assert_eq!(storage.list_announcement_replies(&announcement.id).await.unwrap().len(), 2);

    assert!(storage.delete_announcement_reply(&first.id).await.unwrap());
    assert!(!storage.delete_announcement_reply(&first.id).await.unwrap());

    pause().await;
    let updated = storage
        .update_announcement(
            &announcement.id,
            AnnouncementPatch {
                is_important: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(updated.is_important);
    assert_eq!(updated.content, announcement.content);
    assert!(updated.updated_at > announcement.updated_at);

    assert!(storage.delete_announcement(&announcement.id).await.unwrap());
    assert!(storage.list_announcement_replies(&announcement.id).await.unwrap().is_empty());

    let err = storage.create_announcement_reply(reply("Late")).await.unwrap_err();
    assert!(matches!(storage_error(&err), StorageError::MissingParent { .. }));
}

async fn course_active_filter<S: Storage>(storage: &S) {
    let course = |title: &str, is_active: bool| NewCourse {
        title: title.to_string(),
        description: None,
        image_url: None,
        course_url: format!("https://courses.example/{}", title),
        created_by: "user-1".to_string(),
        is_active,
    };
    let active = storage.create_course(course("rust-101", true)).await.unwrap();
    let hidden = storage.create_course(course("cobol-101", false)).await.unwrap();

    let listed: Vec<String> = storage
        .list_active_courses()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert!(listed.contains(&active.id));
    assert!(!listed.contains(&hidden.id));
    assert_eq!(storage.list_courses().await.unwrap().len(), 2);

    let shown = storage
        .update_course(
            &hidden.id,
            CoursePatch {
                is_active: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(shown.is_active);
    assert_eq!(shown.course_url, hidden.course_url);
    assert_eq!(storage.list_active_courses().await.unwrap().len(), 2);

    assert!(storage.delete_course(&active.id).await.unwrap());
    assert!(storage.delete_course(&hidden.id).await.unwrap());
}

async fn techfest_team_scenario<S: Storage>(storage: &S) {
    let technofest = storage
        .create_technofest(NewTechnofest {
            slug: Some("hack-night".to_string()),
            name: "Hack Night".to_string(),
            category: "coding".to_string(),
            team_min: 2,
            team_max: 4,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(is_canonical_uuid(&technofest.id));
    assert_eq!(
        storage.get_technofest_by_slug("hack-night").await.unwrap().unwrap().id,
        technofest.id
    );
    assert_eq!(storage.list_technofests_by_category("coding").await.unwrap().len(), 1);
    assert!(storage.list_technofests_by_category("robotics").await.unwrap().is_empty());

    let registration = storage
        .create_techfest_registration(NewTechfestRegistration {
            technofest_id: technofest.id.clone(),
            team_name: "Alpha".to_string(),
            team_leader_name: "Ann".to_string(),
            team_leader_email: "ann@x.com".to_string(),
            contact_email: "ann@x.com".to_string(),
            status: None,
        })
        .await
        .unwrap();
    assert!(is_canonical_uuid(&registration.id));
    assert_eq!(registration.status, RegistrationStatus::Pending);

    let members = storage
        .bulk_create_registration_members(vec![
            NewRegistrationMember {
                registration_id: registration.id.clone(),
                name: "Bo".to_string(),
                email: None,
            },
            NewRegistrationMember {
                registration_id: registration.id.clone(),
                name: "Cy".to_string(),
                email: Some("cy@x.com".to_string()),
            },
        ])
        .await
        .unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.iter().all(|m| is_canonical_uuid(&m.id)));

    let counts = storage.list_techfest_registrations_with_team_counts().await.unwrap();
    let alpha = counts
        .iter()
        .find(|c| c.registration.id == registration.id)
        .expect("registration listed with count");
    assert_eq!(alpha.member_count, 3);

    let renamed = storage
        .update_registration_member(
            &members[0].id,
            RegistrationMemberPatch {
                email: Some(Some("bo@x.com".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "Bo");
    assert_eq!(renamed.email.as_deref(), Some("bo@x.com"));

    let err = storage
        .create_technofest(NewTechnofest {
            slug: Some("hack-night".to_string()),
            name: "Copycat".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(storage_error(&err), StorageError::Conflict { .. }));

    assert!(storage.delete_technofest(&technofest.id).await.unwrap());
    assert!(storage.get_techfest_registration(&registration.id).await.unwrap().is_none());
    assert!(storage.list_registration_members(&registration.id).await.unwrap().is_empty());
    assert!(storage.get_registration_member(&members[1].id).await.unwrap().is_none());
    assert!(!storage.delete_technofest(&technofest.id).await.unwrap());
}

async fn techfest_registration_with_members<S: Storage>(storage: &S) {
    let technofest = storage
        .create_technofest(NewTechnofest {
            name: "Robo Race".to_string(),
            number: Some(2),
            category: "robotics".to_string(),
            team_min: 1,
            team_max: 3,
            is_active: false,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(storage
        .list_active_technofests()
        .await
        .unwrap()
        .iter()
        .all(|t| t.id != technofest.id));

    let input = NewTechfestRegistration {
        technofest_id: technofest.id.clone(),
        team_name: "Wheels".to_string(),
        team_leader_name: "Dee".to_string(),
        team_leader_email: "dee@x.com".to_string(),
        contact_email: "team@x.com".to_string(),
        status: Some(RegistrationStatus::Approved),
    };
    let (registration, members) = storage
        .create_techfest_registration_with_members(
            input.clone(),
            vec![MemberDetails {
                name: "Eli".to_string(),
                email: None,
            }],
        )
        .await
        .unwrap();
    assert_eq!(registration.status, RegistrationStatus::Approved);
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].registration_id, registration.id);
    assert_eq!(
        storage.list_techfest_registrations_for_event(&technofest.id).await.unwrap().len(),
        1
    );

    let err = storage
        .create_techfest_registration(NewTechfestRegistration {
            technofest_id: "missing".to_string(),
            ..input
        })
        .await
        .unwrap_err();
    assert!(matches!(storage_error(&err), StorageError::MissingParent { .. }));

    assert!(storage.delete_techfest_registration(&registration.id).await.unwrap());
    assert!(storage.list_registration_members(&registration.id).await.unwrap().is_empty());
    assert!(storage.get_technofest(&technofest.id).await.unwrap().is_some());
    assert!(storage.delete_technofest(&technofest.id).await.unwrap());
}

async fn site_settings_upsert<S: Storage>(storage: &S) {
    assert!(storage.get_site_setting("accent").await.unwrap().is_none());
    storage.set_site_setting("accent", "teal").await.unwrap();
    let overwritten = storage.set_site_setting("accent", "amber").await.unwrap();
    assert_eq!(overwritten.value, "amber");
    assert_eq!(storage.get_site_setting("accent").await.unwrap().as_deref(), Some("amber"));
    assert_eq!(
        storage
            .list_site_settings()
            .await
            .unwrap()
            .iter()
            .filter(|s| s.key == "accent")
            .count(),
        1
    );
    assert!(storage.delete_site_setting("accent").await.unwrap());
    assert!(!storage.delete_site_setting("accent").await.unwrap());
}

async fn seed_roles<S: Storage>(storage: &S) {
    seed_storage(storage).await.unwrap();
    let roles: Vec<UserRole> = storage.list_users().await.unwrap().iter().map(|u| u.role).collect();
    assert!(roles.len() >= 3);
    for role in [UserRole::User, UserRole::Coordinator, UserRole::SuperAdmin] {
        assert!(roles.contains(&role), "missing seeded role {}", role);
    }
    assert!(!storage.list_admins().await.unwrap().is_empty());
    assert!(!storage.list_technofests().await.unwrap().is_empty());
}
