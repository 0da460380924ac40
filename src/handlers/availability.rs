use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::{parse_date, required};
use crate::models::{AvailableRoom, DailyAvailability, RoomTypeAvailability, StayRange};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
    pub hotel_id: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub room_type_id: Option<String>,
}

/// Checks a requested stay: both dates parse, check-in comes first and is
/// not before `today`.
pub fn validate_stay(
    check_in: &str,
    check_out: &str,
    today: NaiveDate,
) -> Result<StayRange, AppError> {
    let check_in = parse_date("checkIn", check_in)?;
    let check_out = parse_date("checkOut", check_out)?;

    let stay = StayRange::new(check_in, check_out).ok_or_else(|| {
        AppError::BadRequest("Check-in date must be before check-out date".to_string())
    })?;

    if stay.check_in < today {
        return Err(AppError::BadRequest(
            "Check-in date cannot be in the past".to_string(),
        ));
    }

    Ok(stay)
}

fn required_params(params: &AvailabilityParams) -> Result<(&str, StayRange), AppError> {
    let (Some(hotel_id), Some(check_in), Some(check_out)) = (
        required(&params.hotel_id),
        required(&params.check_in),
        required(&params.check_out),
    ) else {
        return Err(AppError::BadRequest(
            "hotelId, checkIn, and checkOut are required".to_string(),
        ));
    };

    let stay = validate_stay(check_in, check_out, Utc::now().date_naive())?;
    Ok((hotel_id, stay))
}

// GET /api/rooms/availability
pub async fn available_rooms(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<Vec<AvailableRoom>>, AppError> {
    let (hotel_id, stay) = required_params(&params)?;
    let room_type_id = required(&params.room_type_id);

    let rooms = state
        .availability
        .list_available_rooms(hotel_id, &stay, room_type_id)?;

    tracing::debug!(hotel_id, available = rooms.len(), "availability checked");
    Ok(Json(rooms))
}

// POST /api/rooms/availability
pub async fn availability_summary(
    State(state): State<Arc<AppState>>,
    Json(params): Json<AvailabilityParams>,
) -> Result<Json<Vec<RoomTypeAvailability>>, AppError> {
    let (hotel_id, stay) = required_params(&params)?;

    let summary = state.availability.summarize_availability(hotel_id, &stay)?;
    Ok(Json(summary))
}

// POST /api/rooms/daily-availability
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAvailabilityRequest {
    pub hotel_id: Option<String>,
    pub dates: Option<Vec<String>>,
    pub room_ids: Option<Vec<String>>,
}

pub async fn daily_availability(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DailyAvailabilityRequest>,
) -> Result<Json<DailyAvailability>, AppError> {
    let (Some(hotel_id), Some(raw_dates)) = (required(&body.hotel_id), body.dates.as_ref()) else {
        return Err(AppError::BadRequest(
            "hotelId and dates array are required".to_string(),
        ));
    };

    let dates = raw_dates
        .iter()
        .map(|d| parse_date("dates", d))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(date) = dates.iter().find(|d| StayRange::single_night(**d).is_none()) {
        return Err(AppError::BadRequest(format!("Date out of range for dates: {date}")));
    }

    let grid = state
        .availability
        .daily_availability(hotel_id, &dates, body.room_ids.as_deref())?;

    Ok(Json(grid))
}
