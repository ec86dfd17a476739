//! Database row types — these map directly to SQLite rows.
//! Distinct from the meetbot-types API models to keep the DB layer
//! independent. Timestamps stay in their stored TEXT form here; the API
//! layer parses them with [`parse_timestamp`].

use chrono::{DateTime, Utc};
use meetbot_types::models::MeetingInfo;
use tracing::warn;

use crate::json_field::JsonField;

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

pub struct BotRow {
    pub id: i64,
    pub user_id: i64,
    pub meeting_info: Option<JsonField<MeetingInfo>>,
    pub meeting_name: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub bot_display_name: Option<String>,
    pub bot_image: Option<String>,
    pub audio_object_key: Option<String>,
    pub created_at: String,
}

pub struct EventRow {
    pub id: i64,
    pub bot_id: i64,
    pub event_type: String,
    pub event_time: String,
    pub details: Option<String>,
    pub created_at: String,
}

/// Insert payload for a bot. `created_at` is stamped by the query layer.
pub struct NewBot {
    pub user_id: i64,
    pub meeting_info: Option<MeetingInfo>,
    pub meeting_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub bot_display_name: Option<String>,
    pub bot_image: Option<String>,
    pub audio_object_key: Option<String>,
}

pub struct NewEvent {
    pub bot_id: i64,
    pub event_type: String,
    pub event_time: DateTime<Utc>,
    pub details: Option<String>,
}

/// Parse a stored timestamp back into UTC.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite's datetime('now') default stores "YYYY-MM-DD HH:MM:SS"
            // without timezone. Parse as naive UTC and convert.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}
