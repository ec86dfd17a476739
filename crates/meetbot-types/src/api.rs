use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::MeetingInfo;

// -- Users --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
}

/// Partial update — omitted fields keep their stored values.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// -- Bots --

/// `meeting_info` is taken as raw JSON so the column's coercion rules
/// apply: an object, a JSON-encoded string, or null are all accepted.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBotRequest {
    pub user_id: i64,
    #[serde(default)]
    pub meeting_info: serde_json::Value,
    pub meeting_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub bot_display_name: Option<String>,
    pub bot_image: Option<String>,
    pub audio_object_key: Option<String>,
}

/// Bot records always carry the raw `audio_object_key`; callers that need
/// a download link exchange it via `/get_audio_download_link/{id}`.
#[derive(Debug, Serialize)]
pub struct BotResponse {
    pub id: i64,
    pub user_id: i64,
    pub meeting_info: Option<MeetingInfo>,
    pub meeting_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub bot_display_name: Option<String>,
    pub bot_image: Option<String>,
    pub audio_object_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

// -- Events --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportEventRequest {
    pub event_type: String,
    pub event_time: DateTime<Utc>,
    pub details: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub bot_id: i64,
    pub event_type: String,
    pub event_time: DateTime<Utc>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

// -- Meetings --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitMeetingLinkRequest {
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct MeetingIdResponse {
    pub meeting_id: String,
}

#[derive(Debug, Serialize)]
pub struct MeetingStatusResponse {
    pub status: String,
    pub info: Option<String>,
}

/// Filter parameters for the meeting listing. Accepted but not yet
/// applied — the listing itself is still a fixed payload.
#[derive(Debug, Default, Deserialize)]
pub struct MeetingFilter {
    pub date: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
    pub title: Option<String>,
}

// -- Audio --

#[derive(Debug, Serialize)]
pub struct AudioLinkResponse {
    pub download_link: String,
}

// -- Shared --

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
