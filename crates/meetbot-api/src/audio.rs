use axum::Json;
use axum::extract::{Path, State};

use meetbot_storage::DOWNLOAD_LINK_EXPIRY;
use meetbot_types::api::AudioLinkResponse;

use crate::error::{ApiError, join_error};
use crate::state::AppState;

/// Served when no storage bucket is configured (local development).
const PLACEHOLDER_DOWNLOAD_LINK: &str = "temporary_s3_link";

/// Exchange a bot's stored audio object key for a time-limited download
/// link. The raw key stays on the bot record; only this endpoint signs.
pub async fn get_audio_download_link(
    State(state): State<AppState>,
    Path(bot_id): Path<i64>,
) -> Result<Json<AudioLinkResponse>, ApiError> {
    let db = state.clone();
    let bot = tokio::task::spawn_blocking(move || db.db.get_bot(bot_id))
        .await
        .map_err(join_error)??
        .ok_or(ApiError::NotFound("Bot not found"))?;

    let key = bot
        .audio_object_key
        .ok_or(ApiError::NotFound("No audio recorded for this bot"))?;

    let download_link = match &state.storage {
        Some(storage) => {
            storage
                .presigned_download_url(&key, DOWNLOAD_LINK_EXPIRY)
                .await?
        }
        None => PLACEHOLDER_DOWNLOAD_LINK.to_string(),
    };

    Ok(Json(AudioLinkResponse { download_link }))
}
