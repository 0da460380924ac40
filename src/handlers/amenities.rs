use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::required;
use crate::models::Amenity;
use crate::state::AppState;

// GET /api/amenities
pub async fn list_amenities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Amenity>>, AppError> {
    let amenities = {
        let db = state.db()?;
        queries::list_amenities(&db)?
    };
    Ok(Json(amenities))
}

// POST /api/amenities
#[derive(Debug, Deserialize)]
pub struct CreateAmenity {
    pub name: Option<String>,
    #[serde(default)]
    pub price: f64,
    pub notes: Option<String>,
}

pub async fn create_amenity(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateAmenity>,
) -> Result<(StatusCode, Json<Amenity>), AppError> {
    let name = required(&body.name)
        .ok_or_else(|| AppError::BadRequest("Amenity name is required".to_string()))?;

    let amenity = Amenity {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        price: body.price,
        notes: body.notes,
    };

    {
        let db = state.db()?;
        queries::create_amenity(&db, &amenity)?;
    }

    Ok((StatusCode::CREATED, Json(amenity)))
}
