use serde::{Deserialize, Serialize};

/// Connection details for the meeting a bot is sent to.
///
/// Not a standalone row — bots embed this as a single JSON column.
/// `platform` and `meeting_id` are mandatory; everything else depends on
/// what the platform hands out (Teams needs tenant/organizer ids, Zoom a
/// password, and so on). Deserializing a mapping without the mandatory
/// fields is an error, never a silent default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingInfo {
    pub platform: String,
    pub meeting_id: String,
    #[serde(default)]
    pub meeting_password: Option<String>,
    #[serde(default)]
    pub organizer_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
}
