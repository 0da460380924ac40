use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::required;
use crate::models::RoomType;
use crate::state::AppState;

// GET /api/room-types
pub async fn list_room_types(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomType>>, AppError> {
    let room_types = {
        let db = state.db()?;
        queries::list_room_types(&db)?
    };
    Ok(Json(room_types))
}

// POST /api/room-types
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomType {
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub base_price: Option<f64>,
    pub max_occupancy: Option<i32>,
    #[serde(default)]
    pub number_of_couches: i32,
    #[serde(default)]
    pub has_stove: bool,
    #[serde(default)]
    pub has_microwave: bool,
    #[serde(default)]
    pub has_sink: bool,
    #[serde(default)]
    pub has_fridge: bool,
    #[serde(default)]
    pub has_mini_fridge: bool,
}

pub async fn create_room_type(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateRoomType>,
) -> Result<(StatusCode, Json<RoomType>), AppError> {
    let (Some(name), Some(base_price), Some(max_occupancy)) =
        (required(&body.name), body.base_price, body.max_occupancy)
    else {
        return Err(AppError::BadRequest(
            "name, basePrice, and maxOccupancy are required".to_string(),
        ));
    };

    if !base_price.is_finite() || base_price < 0.0 {
        return Err(AppError::BadRequest("basePrice must be non-negative".to_string()));
    }
    if max_occupancy < 1 {
        return Err(AppError::BadRequest("maxOccupancy must be at least 1".to_string()));
    }

    let room_type = RoomType {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        description: body.description,
        base_price,
        max_occupancy,
        number_of_couches: body.number_of_couches,
        has_stove: body.has_stove,
        has_microwave: body.has_microwave,
        has_sink: body.has_sink,
        has_fridge: body.has_fridge,
        has_mini_fridge: body.has_mini_fridge,
    };

    {
        let db = state.db()?;
        queries::create_room_type(&db, &room_type)?;
    }

    Ok((StatusCode::CREATED, Json(room_type)))
}
