//! Meeting submission and status endpoints.
//!
//! There is no scheduler behind these yet — submission hands back an
//! identifier the caller can poll with, and the status endpoints serve
//! fixed payloads until bots report real state.

use axum::Json;
use axum::extract::Path;
use axum_extra::extract::Query;
use uuid::Uuid;

use meetbot_types::api::{
    MeetingFilter, MeetingIdResponse, MeetingStatusResponse, StatusResponse,
    SubmitMeetingLinkRequest,
};

use crate::error::ApiError;

pub async fn submit_meeting_link(
    Json(req): Json<SubmitMeetingLinkRequest>,
) -> Result<Json<MeetingIdResponse>, ApiError> {
    if req.link.trim().is_empty() {
        return Err(ApiError::Validation("link must not be empty".into()));
    }

    Ok(Json(MeetingIdResponse {
        meeting_id: format!("meeting-{}", Uuid::new_v4()),
    }))
}

pub async fn get_meeting(Path(_meeting_id): Path<String>) -> Json<MeetingStatusResponse> {
    Json(MeetingStatusResponse {
        status: "meeting_status".to_string(),
        info: Some("additional_info".to_string()),
    })
}

/// Filter parameters are accepted (including repeated `attendees` keys)
/// but not yet applied to the fixed listing.
pub async fn get_meetings(
    Query(_filter): Query<MeetingFilter>,
) -> Json<Vec<MeetingStatusResponse>> {
    Json(vec![
        MeetingStatusResponse {
            status: "status1".to_string(),
            info: Some("info1".to_string()),
        },
        MeetingStatusResponse {
            status: "status2".to_string(),
            info: Some("info2".to_string()),
        },
    ])
}

/// Triggered by an external cron to provision bots for upcoming meetings.
pub async fn setup_bots() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "bots setup triggered".to_string(),
    })
}

/// Bots ping this every few seconds while running.
pub async fn heartbeat() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "heartbeat received".to_string(),
    })
}
