use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use meetbot_db::models::{UserRow, parse_timestamp};
use meetbot_types::api::{CreateUserRequest, MessageResponse, UpdateUserRequest, UserResponse};

use crate::error::{ApiError, join_error};
use crate::state::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.trim().is_empty() {
        return Err(ApiError::Validation("username must not be empty".into()));
    }
    if req.email.trim().is_empty() {
        return Err(ApiError::Validation("email must not be empty".into()));
    }

    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || db.db.create_user(&req.username, &req.email))
        .await
        .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(user_response(user))))
}

pub async fn get_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let db = state.clone();
    let users = tokio::task::spawn_blocking(move || db.db.get_users())
        .await
        .map_err(join_error)??;

    Ok(Json(users.into_iter().map(user_response).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user(user_id))
        .await
        .map_err(join_error)??
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(user_response(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let db = state.clone();
    let user = tokio::task::spawn_blocking(move || {
        db.db
            .update_user(user_id, req.username.as_deref(), req.email.as_deref())
    })
    .await
    .map_err(join_error)??
    .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(user_response(user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let db = state.clone();
    let deleted = tokio::task::spawn_blocking(move || db.db.delete_user(user_id))
        .await
        .map_err(join_error)??;

    if !deleted {
        return Err(ApiError::NotFound("User not found"));
    }

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}

fn user_response(row: UserRow) -> UserResponse {
    UserResponse {
        id: row.id,
        username: row.username,
        email: row.email,
        created_at: parse_timestamp(&row.created_at),
    }
}
