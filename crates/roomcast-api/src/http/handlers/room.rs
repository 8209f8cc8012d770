//! Room HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/rooms                    - Create a room
//! - GET  /api/v1/rooms/{room_id}          - Get a room with its history
//! - GET  /api/v1/rooms/{room_id}/messages - Page through a room's history

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use roomcast_types::message::Message;
use roomcast_types::room::Room;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for room creation.
#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub room_id: String,
}

/// Query parameters for message paging.
///
/// Out-of-range values are normalized downstream (non-positive size acts
/// as 1, pages past history come back empty), never rejected.
#[derive(Debug, Deserialize)]
pub struct MessagePageQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    20
}

/// POST /api/v1/rooms - Create a room.
pub async fn create_room(
    State(state): State<AppState>,
    Json(body): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    let room_id = body.room_id.trim();
    if room_id.is_empty() {
        return Err(AppError::Validation("room_id must not be blank".to_string()));
    }

    let room = state.registry.create_room(room_id).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// GET /api/v1/rooms/{room_id} - Get a room and its full history.
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, AppError> {
    let room = state.registry.get_room(&room_id).await?;
    Ok(Json(room))
}

/// GET /api/v1/rooms/{room_id}/messages - One page of history, newest page 0.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(query): Query<MessagePageQuery>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state
        .registry
        .page_messages(&room_id, query.page, query.size)
        .await?;
    Ok(Json(messages))
}
