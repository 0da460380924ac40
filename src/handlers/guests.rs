use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::{is_unique_violation, parse_date, required};
use crate::models::Guest;
use crate::state::AppState;

// GET /api/guests
pub async fn list_guests(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Guest>>, AppError> {
    let guests = {
        let db = state.db()?;
        queries::list_guests(&db)?
    };
    Ok(Json(guests))
}

// POST /api/guests
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
    pub id_number: Option<String>,
}

pub async fn create_guest(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateGuest>,
) -> Result<(StatusCode, Json<Guest>), AppError> {
    let (Some(first_name), Some(last_name), Some(email)) = (
        required(&body.first_name),
        required(&body.last_name),
        required(&body.email),
    ) else {
        return Err(AppError::BadRequest(
            "First name, last name, and email are required".to_string(),
        ));
    };

    let date_of_birth = required(&body.date_of_birth)
        .map(|d| parse_date("dateOfBirth", d))
        .transpose()?;

    let guest = Guest {
        id: uuid::Uuid::new_v4().to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_lowercase(),
        phone: body.phone,
        address: body.address,
        date_of_birth,
        id_number: body.id_number,
        created_at: chrono::Utc::now().naive_utc(),
    };

    {
        let db = state.db()?;
        queries::create_guest(&db, &guest).map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Email already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?;
    }

    tracing::info!(guest_id = %guest.id, name = %guest.full_name(), "guest registered");
    Ok((StatusCode::CREATED, Json(guest)))
}
