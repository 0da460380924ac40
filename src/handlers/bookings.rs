use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::{parse_date, required};
use crate::models::{Booking, BookingDetails, BookingStatus};
use crate::services::booking::{self, NewBooking};
use crate::state::AppState;

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookingDetails>>, AppError> {
    let bookings = {
        let db = state.db()?;
        queries::list_bookings(&db)?
    };
    Ok(Json(bookings))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = {
        let db = state.db()?;
        queries::get_booking(&db, &id)?
    };

    booking
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}

// POST /api/bookings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub guest_id: Option<String>,
    pub room_id: Option<String>,
    pub hotel_id: Option<String>,
    pub notes: Option<String>,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBooking>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let (Some(check_in), Some(check_out), Some(guest_id), Some(room_id), Some(hotel_id)) = (
        required(&body.check_in),
        required(&body.check_out),
        required(&body.guest_id),
        required(&body.room_id),
        required(&body.hotel_id),
    ) else {
        return Err(AppError::BadRequest(
            "Check-in, check-out, guest, room, and hotel are required".to_string(),
        ));
    };

    let new = NewBooking {
        hotel_id: hotel_id.to_string(),
        room_id: room_id.to_string(),
        guest_id: guest_id.to_string(),
        check_in: parse_date("checkIn", check_in)?,
        check_out: parse_date("checkOut", check_out)?,
        notes: body.notes.clone(),
    };

    let booking = {
        let mut db = state.db()?;
        booking::create_booking(&mut db, new)?
    };

    Ok((StatusCode::CREATED, Json(booking)))
}

// POST /api/bookings/:id/status
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatus {
    pub status: BookingStatus,
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBookingStatus>,
) -> Result<Json<Booking>, AppError> {
    let booking = {
        let db = state.db()?;
        booking::update_status(&db, &id, body.status)?
    };

    tracing::info!(booking_id = %id, status = booking.status.as_str(), "booking status changed");
    Ok(Json(booking))
}
