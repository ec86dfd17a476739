use axum::Json;
use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;
use crate::{audio, bots, events, meetings, users};

/// Build the full route set. Layers (CORS, tracing) are applied by the
/// server binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        // Users
        .route("/create_user", post(users::create_user))
        .route("/users", get(users::get_users))
        .route(
            "/users/{user_id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Bots
        .route("/create_bot", post(bots::create_bot))
        .route("/bots", get(bots::get_bots))
        .route("/bots/{bot_id}", get(bots::get_bot).delete(bots::delete_bot))
        .route("/bots/{bot_id}/events", post(events::report_event))
        // Events
        .route("/events", get(events::get_events))
        .route("/events/{event_id}", get(events::get_event))
        .route("/events/bot/{bot_id}", get(events::get_events_for_bot))
        // Meetings
        .route("/submit_meeting_link", post(meetings::submit_meeting_link))
        .route("/get_meeting/{meeting_id}", get(meetings::get_meeting))
        .route("/get_meetings", get(meetings::get_meetings))
        .route("/setup_bots", post(meetings::setup_bots))
        .route("/heartbeat", post(meetings::heartbeat))
        // Audio
        .route(
            "/get_audio_download_link/{bot_id}",
            get(audio::get_audio_download_link),
        )
        .with_state(state)
}

async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ping": "pong!" }))
}
