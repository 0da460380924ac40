use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub room_id: String,
    pub hotel_id: String,
    pub guest_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub status: BookingStatus,
    pub total_amount: f64,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    pub const ACTIVE: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::CheckedIn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::CheckedOut => "checked_out",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "checked_in" => Some(BookingStatus::CheckedIn),
            "checked_out" => Some(BookingStatus::CheckedOut),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether a booking in this status holds its room.
    pub fn is_active(&self) -> bool {
        match self {
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::CheckedIn => true,
            BookingStatus::CheckedOut | BookingStatus::Cancelled => false,
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (*self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::CheckedIn)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
                | (BookingStatus::CheckedIn, BookingStatus::CheckedOut)
        )
    }
}

/// A booking joined with the names the bookings list shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub guest_name: String,
    pub room_number: String,
    pub room_type_name: String,
    pub hotel_name: String,
}
