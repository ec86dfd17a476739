// Router-level tests driven through tower's oneshot, against an
// in-memory database and no storage backend.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use meetbot_api::routes;
use meetbot_api::state::{AppState, AppStateInner};

fn test_app() -> Router {
    let db = meetbot_db::Database::open_in_memory().expect("in-memory db");
    let state: AppState = Arc::new(AppStateInner { db, storage: None });
    routes::router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn create_user(app: &Router, username: &str, email: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/create_user",
        Some(json!({ "username": username, "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("user id")
}

async fn create_bot(app: &Router, user_id: i64, extra: Value) -> (StatusCode, Value) {
    let mut body = json!({
        "user_id": user_id,
        "meeting_info": null,
        "meeting_name": "Standup",
        "start_time": "2026-08-05T09:00:00Z",
        "end_time": "2026-08-05T09:30:00Z",
        "bot_display_name": null,
        "bot_image": null,
        "audio_object_key": null
    });
    if let (Some(obj), Some(patch)) = (body.as_object_mut(), extra.as_object()) {
        for (k, v) in patch {
            obj.insert(k.clone(), v.clone());
        }
    }
    send(app, "POST", "/create_bot", Some(body)).await
}

#[tokio::test]
async fn ping_pong() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/ping", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ping": "pong!" }));
}

#[tokio::test]
async fn user_crud_lifecycle() {
    let app = test_app();
    let id = create_user(&app, "ada", "ada@example.com").await;

    let (status, body) = send(&app, "GET", &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada");
    assert!(body["created_at"].is_string());

    // Partial update keeps the omitted field
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/users/{}", id),
        Some(json!({ "email": "ada@lovelace.dev" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada");
    assert_eq!(body["email"], "ada@lovelace.dev");

    let (status, body) = send(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, body) = send(&app, "GET", &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn missing_user_is_404_without_side_effects() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/users/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (_, body) = send(&app, "GET", "/users", None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_user_body_is_rejected() {
    let app = test_app();
    let (status, _) = send(&app, "POST", "/create_user", Some(json!({ "username": "ada" }))).await;
    assert!(status.is_client_error(), "got {}", status);

    let (status, body) = send(
        &app,
        "POST",
        "/create_user",
        Some(json!({ "username": "", "email": "a@b.c" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("username"));
}

#[tokio::test]
async fn bot_carries_nested_meeting_info() {
    let app = test_app();
    let user_id = create_user(&app, "ada", "ada@example.com").await;

    let info = json!({
        "platform": "zoom",
        "meeting_id": "987-654-321",
        "meeting_password": "s3cret"
    });
    let (status, body) = create_bot(&app, user_id, json!({ "meeting_info": info })).await;
    assert_eq!(status, StatusCode::CREATED);
    let bot_id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/bots/{}", bot_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meeting_info"]["platform"], "zoom");
    assert_eq!(body["meeting_info"]["meeting_id"], "987-654-321");
    // Optional fields default rather than vanish
    assert_eq!(body["meeting_info"]["organizer_id"], Value::Null);
}

#[tokio::test]
async fn meeting_info_accepts_json_encoded_strings() {
    let app = test_app();
    let user_id = create_user(&app, "ada", "ada@example.com").await;

    let encoded = json!({ "platform": "teams", "meeting_id": "19:abc@thread.v2" }).to_string();
    let (status, body) = create_bot(&app, user_id, json!({ "meeting_info": encoded })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["meeting_info"]["platform"], "teams");
}

#[tokio::test]
async fn meeting_info_missing_required_field_is_rejected() {
    let app = test_app();
    let user_id = create_user(&app, "ada", "ada@example.com").await;

    let (status, body) = create_bot(
        &app,
        user_id,
        json!({ "meeting_info": { "platform": "zoom" } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("meeting_id"));

    // And a string that is not JSON at all
    let (status, _) = create_bot(&app, user_id, json!({ "meeting_info": "{not json" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was stored along the way
    let (_, body) = send(&app, "GET", "/bots", None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn bot_without_meeting_info_reads_back_null() {
    let app = test_app();
    let user_id = create_user(&app, "ada", "ada@example.com").await;

    let (status, body) = create_bot(&app, user_id, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    let bot_id = body["id"].as_i64().unwrap();

    let (_, body) = send(&app, "GET", &format!("/bots/{}", bot_id), None).await;
    assert_eq!(body["meeting_info"], Value::Null);
}

#[tokio::test]
async fn bot_with_unknown_user_is_a_conflict() {
    let app = test_app();
    let (status, _) = create_bot(&app, 999, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn bot_delete_then_get_is_404() {
    let app = test_app();
    let user_id = create_user(&app, "ada", "ada@example.com").await;
    let (_, body) = create_bot(&app, user_id, json!({})).await;
    let bot_id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/bots/{}", bot_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Bot deleted successfully");

    let (status, _) = send(&app, "GET", &format!("/bots/{}", bot_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn events_are_reported_against_a_bot() {
    let app = test_app();
    let user_id = create_user(&app, "ada", "ada@example.com").await;
    let (_, body) = create_bot(&app, user_id, json!({})).await;
    let bot_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/bots/{}/events", bot_id),
        Some(json!({
            "event_type": "JOINING_CALL",
            "event_time": "2026-08-05T09:00:05Z",
            "details": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["bot_id"], bot_id);
    let event_id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/events/{}", event_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event_type"], "JOINING_CALL");

    let (status, body) = send(&app, "GET", &format!("/events/bot/{}", bot_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Unknown bot cannot accumulate events
    let (status, _) = send(
        &app,
        "POST",
        "/bots/999/events",
        Some(json!({
            "event_type": "JOINING_CALL",
            "event_time": "2026-08-05T09:00:05Z",
            "details": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn meeting_endpoints_serve_their_fixed_payloads() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/submit_meeting_link",
        Some(json!({ "link": "https://example.com/meeting" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["meeting_id"].as_str().unwrap().starts_with("meeting-"));

    let (status, body) = send(&app, "GET", "/get_meeting/some-meeting", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "meeting_status");

    let (status, body) = send(
        &app,
        "GET",
        "/get_meetings?date=2026-08-05&attendees=Alice&attendees=Bob&title=Sync",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(&app, "POST", "/setup_bots", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "bots setup triggered");

    let (status, body) = send(&app, "POST", "/heartbeat", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "heartbeat received");
}

#[tokio::test]
async fn audio_link_falls_back_to_placeholder_without_storage() {
    let app = test_app();
    let user_id = create_user(&app, "ada", "ada@example.com").await;

    let (_, body) = create_bot(
        &app,
        user_id,
        json!({ "audio_object_key": "recordings/audio-1.mp3" }),
    )
    .await;
    let bot_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/get_audio_download_link/{}", bot_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["download_link"], "temporary_s3_link");
}

#[tokio::test]
async fn audio_link_requires_bot_and_key() {
    let app = test_app();

    let (status, _) = send(&app, "GET", "/get_audio_download_link/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let user_id = create_user(&app, "ada", "ada@example.com").await;
    let (_, body) = create_bot(&app, user_id, json!({})).await;
    let bot_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/get_audio_download_link/{}", bot_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No audio recorded for this bot");
}
