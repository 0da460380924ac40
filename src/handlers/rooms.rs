use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::{is_unique_violation, required};
use crate::models::{Room, RoomStatus, RoomWithType};
use crate::state::AppState;

// GET /api/rooms
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomWithType>>, AppError> {
    let rooms = {
        let db = state.db()?;
        queries::list_rooms(&db)?
    };
    Ok(Json(rooms))
}

// POST /api/rooms
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoom {
    pub number: Option<String>,
    pub floor: Option<i32>,
    pub hotel_id: Option<String>,
    pub room_type_id: Option<String>,
    pub status: Option<RoomStatus>,
}

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateRoom>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    let (Some(number), Some(hotel_id), Some(room_type_id)) = (
        required(&body.number),
        required(&body.hotel_id),
        required(&body.room_type_id),
    ) else {
        return Err(AppError::BadRequest(
            "number, hotelId, and roomTypeId are required".to_string(),
        ));
    };

    let room = Room {
        id: uuid::Uuid::new_v4().to_string(),
        hotel_id: hotel_id.to_string(),
        room_type_id: room_type_id.to_string(),
        number: number.to_string(),
        floor: body.floor,
        status: body.status.unwrap_or(RoomStatus::Available),
    };

    {
        let db = state.db()?;
        if queries::get_hotel(&db, &room.hotel_id)?.is_none() {
            return Err(AppError::NotFound(format!("hotel {}", room.hotel_id)));
        }
        if queries::get_room_type(&db, &room.room_type_id)?.is_none() {
            return Err(AppError::NotFound(format!("room type {}", room.room_type_id)));
        }
        queries::create_room(&db, &room).map_err(|e| {
            match e.downcast_ref::<rusqlite::Error>() {
                Some(sql) if is_unique_violation(sql) => AppError::Conflict(format!(
                    "Room {} already exists in this hotel",
                    room.number
                )),
                _ => AppError::Internal(e),
            }
        })?;
    }

    tracing::info!(room_id = %room.id, hotel_id = %room.hotel_id, "room created");
    Ok((StatusCode::CREATED, Json(room)))
}

// POST /api/rooms/:id/status
#[derive(Debug, Deserialize)]
pub struct UpdateRoomStatus {
    pub status: RoomStatus,
}

pub async fn update_room_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateRoomStatus>,
) -> Result<Json<serde_json::Value>, AppError> {
    let updated = {
        let db = state.db()?;
        queries::update_room_status(&db, &id, body.status)?
    };

    if !updated {
        return Err(AppError::NotFound(format!("room {id}")));
    }

    tracing::info!(room_id = %id, status = body.status.as_str(), "room status changed");
    Ok(Json(serde_json::json!({ "ok": true, "status": body.status })))
}
