use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::storage::{seed_storage, MemoryStorage};
use crate::{create_router, AppState};

async fn app() -> Router {
    let storage = MemoryStorage::new();
    seed_storage(&storage).await.unwrap();
    create_router(AppState::new(Arc::new(storage)), "http://localhost:5173").unwrap()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, path: &str, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        path,
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

async fn admin_token(app: &Router) -> String {
    login(app, "/api/auth/admin/login", "admin", "admin123").await
}

async fn user_token(app: &Router, username: &str) -> String {
    login(app, "/api/auth/login", username, &format!("{}123", username)).await
}

fn new_event(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Lightning talks",
        "date": "2030-01-01T10:00:00Z",
        "location": "Hall"
    })
}

#[tokio::test]
async fn test_public_reads() {
    let app = app().await;

    let (status, events) = send(&app, Method::GET, "/api/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.as_array().unwrap().len(), 2);

    let (status, technofest) = send(&app, Method::GET, "/api/technofests/slug/code-sprint", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(technofest["teamMax"], 3);

    let (status, setting) = send(&app, Method::GET, "/api/settings/backgroundSceneUrl", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(setting["key"], "backgroundSceneUrl");
}

#[tokio::test]
async fn test_missing_record_is_404() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/events/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Event not found");
}

#[tokio::test]
async fn test_mutations_require_a_staff_session() {
    let app = app().await;

    let (status, _) = send(&app, Method::POST, "/api/events", None, Some(new_event("Talks"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/events",
        Some("not-a-session"),
        Some(new_event("Talks")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let member = user_token(&app, "member").await;
    let (status, _) = send(&app, Method::POST, "/api/events", Some(&member), Some(new_event("Talks"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let coordinator = user_token(&app, "coordinator").await;
    let (status, event) = send(
        &app,
        Method::POST,
        "/api/events",
        Some(&coordinator),
        Some(new_event("Talks")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["title"], "Talks");
    assert_eq!(event["tags"], json!([]));
}

#[tokio::test]
async fn test_invalid_bodies_are_400() {
    let app = app().await;
    let admin = admin_token(&app).await;

    let (status, body) = send(&app, Method::POST, "/api/events", Some(&admin), Some(new_event(" "))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title cannot be empty");

    let mut bad_date = new_event("Talks");
    bad_date["date"] = json!("next tuesday");
    let (status, _) = send(&app, Method::POST, "/api/events", Some(&admin), Some(bad_date)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/polls",
        Some(&admin),
        Some(json!({ "title": "One option", "options": ["only"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/technofests",
        Some(&admin),
        Some(json!({ "name": "Upside down", "teamMin": 4, "teamMax": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_event() {
    let app = app().await;
    let admin = admin_token(&app).await;
    let (_, event) = send(&app, Method::POST, "/api/events", Some(&admin), Some(new_event("Talks"))).await;
    let uri = format!("/api/events/{}", event["id"].as_str().unwrap());

    let (status, updated) = send(&app, Method::PUT, &uri, Some(&admin), Some(json!({ "featured": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["featured"], true);
    assert_eq!(updated["title"], "Talks");

    let (status, count) = send(&app, Method::POST, "/api/events/unfeature-all", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(count["count"].as_u64().unwrap() >= 1);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_waits_for_approval() {
    let app = app().await;
    let (status, user) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "username": "fresh", "email": "fresh@x.com", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(user.get("password").is_none());

    let credentials = json!({ "username": "fresh", "password": "pw" });
    let (status, _) = send(&app, Method::POST, "/api/auth/login", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = admin_token(&app).await;
    let approve = format!("/api/users/{}/approve", user["id"].as_str().unwrap());
    let (status, approved) = send(&app, Method::POST, &approve, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["isApproved"], true);

    let (status, _) = send(&app, Method::POST, "/api/auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "username": "fresh", "email": "other@x.com", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = app().await;
    let admin = admin_token(&app).await;

    let (status, session) = send(&app, Method::GET, "/api/auth/session", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["subject"]["kind"], "admin");

    let (status, _) = send(&app, Method::POST, "/api/auth/logout", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, "/api/auth/session", Some(&admin), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_poll_voting() {
    let app = app().await;
    let (_, polls) = send(&app, Method::GET, "/api/polls", None, None).await;
    let poll_id = polls[0]["id"].as_str().unwrap().to_string();
    let vote_uri = format!("/api/polls/{}/vote", poll_id);

    let admin = admin_token(&app).await;
    let (status, _) = send(&app, Method::POST, &vote_uri, Some(&admin), Some(json!({ "selectedOption": 0 }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let member = user_token(&app, "member").await;
    let (status, response) = send(&app, Method::POST, &vote_uri, Some(&member), Some(json!({ "selectedOption": 2 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["username"], "member");

    let (status, _) = send(&app, Method::POST, &vote_uri, Some(&member), Some(json!({ "selectedOption": 1 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let coordinator = user_token(&app, "coordinator").await;
    let (status, _) = send(&app, Method::POST, &vote_uri, Some(&coordinator), Some(json!({ "selectedOption": 7 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, results) = send(&app, Method::GET, &format!("/api/polls/{}/results", poll_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results["totalVotes"], 1);
    assert_eq!(results["tally"], json!([0, 0, 1]));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/polls/missing/vote",
        Some(&member),
        Some(json!({ "selectedOption": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_polls_are_attributed_to_the_session() {
    let app = app().await;
    let coordinator = user_token(&app, "coordinator").await;
    let (_, session) = send(&app, Method::GET, "/api/auth/session", Some(&coordinator), None).await;

    let (status, poll) = send(
        &app,
        Method::POST,
        "/api/polls",
        Some(&coordinator),
        Some(json!({ "title": "Pizza?", "options": ["yes", "no"], "createdBy": "someone-else" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(poll["createdBy"], session["subject"]["id"]);
}

#[tokio::test]
async fn test_announcement_replies() {
    let app = app().await;
    let (_, announcements) = send(&app, Method::GET, "/api/announcements", None, None).await;
    let replies_uri = format!(
        "/api/announcements/{}/replies",
        announcements[0]["id"].as_str().unwrap()
    );

    let member = user_token(&app, "member").await;
    let (status, reply) = send(&app, Method::POST, &replies_uri, Some(&member), Some(json!({ "content": "Nice" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, replies) = send(&app, Method::GET, &replies_uri, None, None).await;
    assert_eq!(replies.as_array().unwrap().len(), 1);

    let admin = admin_token(&app).await;
    let delete_uri = format!("/api/announcements/replies/{}", reply["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::DELETE, &delete_uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_team_registration_and_cascade() {
    let app = app().await;
    let (_, technofest) = send(&app, Method::GET, "/api/technofests/slug/code-sprint", None, None).await;
    let technofest_id = technofest["id"].as_str().unwrap().to_string();

    let registration = |members: Value| {
        json!({
            "technofestId": technofest_id,
            "teamName": "Alpha",
            "teamLeaderName": "Ann",
            "teamLeaderEmail": "ann@x.com",
            "contactEmail": "ann@x.com",
            "members": members
        })
    };

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/techfest-registrations",
        None,
        Some(registration(json!([{ "name": "Bo" }, { "name": "Cy" }, { "name": "Di" }]))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/techfest-registrations",
        None,
        Some(registration(json!([{ "name": "Bo" }, { "name": "Cy", "email": "cy@x.com" }]))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["registration"]["status"], "pending");
    assert_eq!(created["members"].as_array().unwrap().len(), 2);
    let registration_id = created["registration"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, Method::GET, "/api/techfest-registrations/with-counts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = admin_token(&app).await;
    let (_, counts) = send(&app, Method::GET, "/api/techfest-registrations/with-counts", Some(&admin), None).await;
    assert_eq!(counts[0]["id"], registration_id.as_str());
    assert_eq!(counts[0]["memberCount"], 3);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/technofests/{}", technofest_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/techfest-registrations/{}", registration_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, members) = send(&app, Method::GET, "/api/registration-members", Some(&admin), None).await;
    assert!(members.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_registration_for_unknown_technofest_is_404() {
    let app = app().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/techfest-registrations",
        None,
        Some(json!({
            "technofestId": "missing",
            "teamName": "Alpha",
            "teamLeaderName": "Ann",
            "teamLeaderEmail": "ann@x.com",
            "contactEmail": "ann@x.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_account_management_needs_admin_or_super_admin() {
    let app = app().await;

    let coordinator = user_token(&app, "coordinator").await;
    let (status, _) = send(&app, Method::GET, "/api/users", Some(&coordinator), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let super_admin = user_token(&app, "superadmin").await;
    let (status, users) = send(&app, Method::GET, "/api/users", Some(&super_admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 3);

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/users/bulk",
        Some(&super_admin),
        Some(json!([
            { "username": "a1", "email": "a1@x.com", "password": "pw" },
            { "username": "a2", "email": "a2@x.com", "password": "pw", "role": "coordinator" }
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created[1]["role"], "coordinator");
}

#[tokio::test]
async fn test_settings_upsert() {
    let app = app().await;
    let admin = admin_token(&app).await;

    let (status, setting) = send(
        &app,
        Method::PUT,
        "/api/settings/theme",
        Some(&admin),
        Some(json!({ "value": "dark" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(setting["value"], "dark");

    send(&app, Method::PUT, "/api/settings/theme", Some(&admin), Some(json!({ "value": "light" }))).await;
    let (_, setting) = send(&app, Method::GET, "/api/settings/theme", None, None).await;
    assert_eq!(setting["value"], "light");

    let (status, _) = send(&app, Method::DELETE, "/api/settings/theme", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, "/api/settings/theme", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_about_section_upsert() {
    let app = app().await;
    let admin = admin_token(&app).await;

    let (status, section) = send(
        &app,
        Method::PUT,
        "/api/about/mission",
        Some(&admin),
        Some(json!({ "title": "Mission", "content": "Build things" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(section["section"], "mission");

    let (_, sections) = send(&app, Method::GET, "/api/about", None, None).await;
    assert_eq!(sections.as_array().unwrap().len(), 2);
}

async fn user_id(app: &Router, admin: &str, username: &str) -> String {
    let (_, users) = send(app, Method::GET, "/api/users", Some(admin), None).await;
    users
        .as_array()
        .unwrap()
        .iter()
        .find(|user| user["username"] == username)
        .and_then(|user| user["id"].as_str())
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_deleted_account_token_stops_working() {
    let app = app().await;
    let admin = admin_token(&app).await;
    let coordinator = user_token(&app, "coordinator").await;
    let id = user_id(&app, &admin, "coordinator").await;

    let (status, _) = send(&app, Method::DELETE, &format!("/api/users/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/polls",
        Some(&coordinator),
        Some(json!({ "title": "Still here?", "options": ["yes", "no"] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, polls) = send(&app, Method::GET, "/api/polls", None, None).await;
    assert_eq!(polls.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_role_and_approval_changes_apply_to_live_tokens() {
    let app = app().await;
    let admin = admin_token(&app).await;
    let coordinator = user_token(&app, "coordinator").await;
    let member = user_token(&app, "member").await;

    let coordinator_uri = format!("/api/users/{}", user_id(&app, &admin, "coordinator").await);
    let (status, _) = send(&app, Method::PUT, &coordinator_uri, Some(&admin), Some(json!({ "role": "user" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::POST, "/api/events", Some(&coordinator), Some(new_event("Talks"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let member_uri = format!("/api/users/{}", user_id(&app, &admin, "member").await);
    let (status, _) = send(&app, Method::PUT, &member_uri, Some(&admin), Some(json!({ "isApproved": false }))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, "/api/auth/session", Some(&member), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_votes_and_replies_follow_the_account_not_the_name() {
    let app = app().await;
    let admin = admin_token(&app).await;
    let member = user_token(&app, "member").await;
    let member_id = user_id(&app, &admin, "member").await;
    let coordinator_id = user_id(&app, &admin, "coordinator").await;

    // Hand the old name to a different account
    send(&app, Method::PUT, &format!("/api/users/{}", member_id), Some(&admin), Some(json!({ "username": "renamed" }))).await;
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/users/{}", coordinator_id),
        Some(&admin),
        Some(json!({ "username": "member" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, polls) = send(&app, Method::GET, "/api/polls", None, None).await;
    let vote_uri = format!("/api/polls/{}/vote", polls[0]["id"].as_str().unwrap());
    let (status, response) = send(&app, Method::POST, &vote_uri, Some(&member), Some(json!({ "selectedOption": 0 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["userId"], member_id.as_str());
    assert_eq!(response["username"], "renamed");

    let (_, announcements) = send(&app, Method::GET, "/api/announcements", None, None).await;
    let replies_uri = format!("/api/announcements/{}/replies", announcements[0]["id"].as_str().unwrap());
    let (status, reply) = send(&app, Method::POST, &replies_uri, Some(&member), Some(json!({ "content": "Hi" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reply["userId"], member_id.as_str());
}

#[tokio::test]
async fn test_null_in_patch_clears_optional_field() {
    let app = app().await;
    let admin = admin_token(&app).await;
    let mut body = new_event("Talks");
    body["imageUrl"] = json!("/a.png");
    let (_, event) = send(&app, Method::POST, "/api/events", Some(&admin), Some(body)).await;
    let uri = format!("/api/events/{}", event["id"].as_str().unwrap());

    let (_, renamed) = send(&app, Method::PUT, &uri, Some(&admin), Some(json!({ "title": "Talks II" }))).await;
    assert_eq!(renamed["imageUrl"], "/a.png");

    let (status, cleared) = send(&app, Method::PUT, &uri, Some(&admin), Some(json!({ "imageUrl": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["imageUrl"].is_null());
    assert_eq!(cleared["title"], "Talks II");
}

#[tokio::test]
async fn test_invalid_patches_are_400() {
    let app = app().await;
    let admin = admin_token(&app).await;

    let (_, technofest) = send(&app, Method::GET, "/api/technofests/slug/code-sprint", None, None).await;
    let technofest_uri = format!("/api/technofests/{}", technofest["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::PUT, &technofest_uri, Some(&admin), Some(json!({ "teamMin": 10 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, unchanged) = send(&app, Method::GET, &technofest_uri, None, None).await;
    assert_eq!(unchanged["teamMin"], technofest["teamMin"]);

    let member_uri = format!("/api/users/{}", user_id(&app, &admin, "member").await);
    let (status, _) = send(&app, Method::PUT, &member_uri, Some(&admin), Some(json!({ "username": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, Method::PUT, &member_uri, Some(&admin), Some(json!({ "email": "nope" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, events) = send(&app, Method::GET, "/api/events", None, None).await;
    let event_uri = format!("/api/events/{}", events[0]["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::PUT, &event_uri, Some(&admin), Some(json!({ "location": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PUT, "/api/events/missing", Some(&admin), Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
