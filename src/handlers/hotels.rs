use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::required;
use crate::models::{Hotel, HotelOverview, RoomTypeInventory};
use crate::state::AppState;

// GET /api/hotels
pub async fn list_hotels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HotelOverview>>, AppError> {
    let hotels = {
        let db = state.db()?;
        queries::list_hotels(&db)?
    };
    Ok(Json(hotels))
}

// POST /api/hotels
#[derive(Debug, Deserialize)]
pub struct CreateHotel {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
}

pub async fn create_hotel(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateHotel>,
) -> Result<(StatusCode, Json<Hotel>), AppError> {
    let name = required(&body.name)
        .ok_or_else(|| AppError::BadRequest("Hotel name is required".to_string()))?;

    let hotel = Hotel {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        address: body.address,
        phone: body.phone,
        email: body.email,
        description: body.description,
        created_at: chrono::Utc::now().naive_utc(),
    };

    {
        let db = state.db()?;
        queries::create_hotel(&db, &hotel)?;
    }

    tracing::info!(hotel_id = %hotel.id, "hotel created");
    Ok((StatusCode::CREATED, Json(hotel)))
}

// GET /api/hotels/:id/inventory
pub async fn room_inventory(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<RoomTypeInventory>>, AppError> {
    {
        let db = state.db()?;
        if queries::get_hotel(&db, &id)?.is_none() {
            return Err(AppError::NotFound(format!("hotel {id}")));
        }
    }

    let inventory = state.availability.room_inventory(&id)?;
    Ok(Json(inventory))
}
