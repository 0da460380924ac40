use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, TransactionBehavior};

use crate::db::queries;
use crate::models::{Booking, BookingStatus, StayRange};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("check-in date must be before check-out date")]
    InvalidStay,

    #[error("room not found: {0}")]
    RoomNotFound(String),

    #[error("guest not found: {0}")]
    GuestNotFound(String),

    #[error("room {room_id} does not belong to hotel {hotel_id}")]
    HotelMismatch { room_id: String, hotel_id: String },

    #[error("room {0} is out of service")]
    RoomOutOfService(String),

    #[error("room is already booked for {check_in} to {check_out}")]
    Conflict {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("booking not found: {0}")]
    NotFound(String),

    #[error("cannot move booking from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for BookingError {
    fn from(e: rusqlite::Error) -> Self {
        BookingError::Store(e.into())
    }
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub hotel_id: String,
    pub room_id: String,
    pub guest_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub notes: Option<String>,
}

/// Creates a pending booking after re-checking the room inside an IMMEDIATE
/// transaction, so no other writer can slip an overlapping stay in between
/// the check and the insert.
pub fn create_booking(conn: &mut Connection, new: NewBooking) -> Result<Booking, BookingError> {
    let stay = StayRange::new(new.check_in, new.check_out).ok_or(BookingError::InvalidStay)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let room = queries::get_room(&tx, &new.room_id)?
        .ok_or_else(|| BookingError::RoomNotFound(new.room_id.clone()))?;

    if room.hotel_id != new.hotel_id {
        return Err(BookingError::HotelMismatch {
            room_id: room.id,
            hotel_id: new.hotel_id,
        });
    }

    if !room.status.is_operational() {
        return Err(BookingError::RoomOutOfService(room.id));
    }

    if queries::get_guest(&tx, &new.guest_id)?.is_none() {
        return Err(BookingError::GuestNotFound(new.guest_id));
    }

    let room_type = queries::get_room_type(&tx, &room.room_type_id)?
        .ok_or_else(|| anyhow::anyhow!("room {} has no room type", room.id))?;

    let existing = queries::active_bookings_for_room(&tx, &room.id, &stay)?;
    if let Some(clash) = existing.iter().find(|b| b.blocks(&stay)) {
        tracing::info!(
            room_id = %room.id,
            check_in = %stay.check_in,
            check_out = %stay.check_out,
            "booking rejected: overlaps existing stay"
        );
        return Err(BookingError::Conflict {
            check_in: clash.stay.check_in,
            check_out: clash.stay.check_out,
        });
    }

    let now = Utc::now().naive_utc();
    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        room_id: room.id,
        hotel_id: new.hotel_id,
        guest_id: new.guest_id,
        check_in: stay.check_in,
        check_out: stay.check_out,
        status: BookingStatus::Pending,
        total_amount: stay.nights() as f64 * room_type.base_price,
        notes: new.notes,
        created_at: now,
        updated_at: now,
    };

    queries::create_booking(&tx, &booking)?;
    tx.commit()?;

    tracing::info!(
        booking_id = %booking.id,
        room_id = %booking.room_id,
        nights = stay.nights(),
        "booking created"
    );

    Ok(booking)
}

pub fn update_status(
    conn: &Connection,
    id: &str,
    next: BookingStatus,
) -> Result<Booking, BookingError> {
    let booking =
        queries::get_booking(conn, id)?.ok_or_else(|| BookingError::NotFound(id.to_string()))?;

    if !booking.status.can_transition_to(next) {
        return Err(BookingError::InvalidTransition {
            from: booking.status.as_str(),
            to: next.as_str(),
        });
    }

    queries::update_booking_status(conn, id, next)?;

    queries::get_booking(conn, id)?.ok_or_else(|| BookingError::NotFound(id.to_string()))
}
