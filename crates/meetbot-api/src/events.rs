use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use meetbot_db::models::{EventRow, NewEvent, parse_timestamp};
use meetbot_types::api::{EventResponse, ReportEventRequest};

use crate::error::{ApiError, join_error};
use crate::state::AppState;

/// Bots call this during a session to record lifecycle events
/// (JOINING_CALL, IN_CALL, CALL_ENDED, ...) as they happen.
pub async fn report_event(
    State(state): State<AppState>,
    Path(bot_id): Path<i64>,
    Json(req): Json<ReportEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.event_type.trim().is_empty() {
        return Err(ApiError::Validation("event_type must not be empty".into()));
    }

    let db = state.clone();
    let event = tokio::task::spawn_blocking(move || {
        if !db.db.bot_exists(bot_id)? {
            return Ok(None);
        }
        db.db
            .create_event(NewEvent {
                bot_id,
                event_type: req.event_type,
                event_time: req.event_time,
                details: req.details,
            })
            .map(Some)
    })
    .await
    .map_err(join_error)??
    .ok_or(ApiError::NotFound("Bot not found"))?;

    Ok((StatusCode::CREATED, Json(event_response(event))))
}

pub async fn get_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let db = state.clone();
    let events = tokio::task::spawn_blocking(move || db.db.get_events())
        .await
        .map_err(join_error)??;

    Ok(Json(events.into_iter().map(event_response).collect()))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventResponse>, ApiError> {
    let db = state.clone();
    let event = tokio::task::spawn_blocking(move || db.db.get_event(event_id))
        .await
        .map_err(join_error)??
        .ok_or(ApiError::NotFound("Event not found"))?;

    Ok(Json(event_response(event)))
}

pub async fn get_events_for_bot(
    State(state): State<AppState>,
    Path(bot_id): Path<i64>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let db = state.clone();
    let events = tokio::task::spawn_blocking(move || {
        if !db.db.bot_exists(bot_id)? {
            return Ok(None);
        }
        db.db.get_events_for_bot(bot_id).map(Some)
    })
    .await
    .map_err(join_error)??
    .ok_or(ApiError::NotFound("Bot not found"))?;

    Ok(Json(events.into_iter().map(event_response).collect()))
}

fn event_response(row: EventRow) -> EventResponse {
    EventResponse {
        id: row.id,
        bot_id: row.bot_id,
        event_type: row.event_type,
        event_time: parse_timestamp(&row.event_time),
        details: row.details,
        created_at: parse_timestamp(&row.created_at),
    }
}
