use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use meetbot_db::JsonField;
use meetbot_db::models::{BotRow, NewBot, parse_timestamp};
use meetbot_types::api::{BotResponse, CreateBotRequest, MessageResponse};
use meetbot_types::models::MeetingInfo;

use crate::error::{ApiError, join_error};
use crate::state::AppState;

pub async fn create_bot(
    State(state): State<AppState>,
    Json(req): Json<CreateBotRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.end_time < req.start_time {
        return Err(ApiError::Validation(
            "end_time must not precede start_time".into(),
        ));
    }

    let meeting_info = JsonField::<MeetingInfo>::coerce(req.meeting_info)
        .map_err(|e| ApiError::Validation(e.to_string()))?
        .map(JsonField::into_inner);

    let db = state.clone();
    let bot = tokio::task::spawn_blocking(move || {
        db.db.create_bot(NewBot {
            user_id: req.user_id,
            meeting_info,
            meeting_name: req.meeting_name,
            start_time: req.start_time,
            end_time: req.end_time,
            bot_display_name: req.bot_display_name,
            bot_image: req.bot_image,
            audio_object_key: req.audio_object_key,
        })
    })
    .await
    .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(bot_response(bot))))
}

pub async fn get_bots(State(state): State<AppState>) -> Result<Json<Vec<BotResponse>>, ApiError> {
    let db = state.clone();
    let bots = tokio::task::spawn_blocking(move || db.db.get_bots())
        .await
        .map_err(join_error)??;

    Ok(Json(bots.into_iter().map(bot_response).collect()))
}

pub async fn get_bot(
    State(state): State<AppState>,
    Path(bot_id): Path<i64>,
) -> Result<Json<BotResponse>, ApiError> {
    let db = state.clone();
    let bot = tokio::task::spawn_blocking(move || db.db.get_bot(bot_id))
        .await
        .map_err(join_error)??
        .ok_or(ApiError::NotFound("Bot not found"))?;

    Ok(Json(bot_response(bot)))
}

pub async fn delete_bot(
    State(state): State<AppState>,
    Path(bot_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let db = state.clone();
    let deleted = tokio::task::spawn_blocking(move || db.db.delete_bot(bot_id))
        .await
        .map_err(join_error)??;

    if !deleted {
        return Err(ApiError::NotFound("Bot not found"));
    }

    Ok(Json(MessageResponse {
        message: "Bot deleted successfully".to_string(),
    }))
}

fn bot_response(row: BotRow) -> BotResponse {
    BotResponse {
        id: row.id,
        user_id: row.user_id,
        meeting_info: row.meeting_info.map(JsonField::into_inner),
        meeting_name: row.meeting_name,
        start_time: parse_timestamp(&row.start_time),
        end_time: parse_timestamp(&row.end_time),
        bot_display_name: row.bot_display_name,
        bot_image: row.bot_image,
        audio_object_key: row.audio_object_key,
        created_at: parse_timestamp(&row.created_at),
    }
}
