use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::db::queries;
use crate::models::{AvailableRoom, BookedSpan, StayRange};

/// Read-only view of rooms and bookings that the availability engine works from.
///
/// Booking lookups may return a superset of what was asked for (any status,
/// any dates); the engine applies the status and overlap rules itself.
pub trait HotelStore: Send + Sync {
    /// Operational rooms of `hotel_id`, optionally restricted to one room type.
    fn operational_rooms(
        &self,
        hotel_id: &str,
        room_type_id: Option<&str>,
    ) -> anyhow::Result<Vec<AvailableRoom>>;

    /// Bookings of `hotel_id` that may intersect `window`.
    fn hotel_bookings(&self, hotel_id: &str, window: &StayRange) -> anyhow::Result<Vec<BookedSpan>>;

    /// Bookings of `room_id` that may intersect `window`.
    fn room_bookings(&self, room_id: &str, window: &StayRange) -> anyhow::Result<Vec<BookedSpan>>;
}

pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> anyhow::Result<T>) -> anyhow::Result<T> {
        let conn = self
            .db
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))?;
        f(&conn)
    }
}

impl HotelStore for SqliteStore {
    fn operational_rooms(
        &self,
        hotel_id: &str,
        room_type_id: Option<&str>,
    ) -> anyhow::Result<Vec<AvailableRoom>> {
        self.with_conn(|conn| queries::operational_rooms(conn, hotel_id, room_type_id))
    }

    fn hotel_bookings(&self, hotel_id: &str, window: &StayRange) -> anyhow::Result<Vec<BookedSpan>> {
        self.with_conn(|conn| queries::active_bookings_for_hotel(conn, hotel_id, window))
    }

    fn room_bookings(&self, room_id: &str, window: &StayRange) -> anyhow::Result<Vec<BookedSpan>> {
        self.with_conn(|conn| queries::active_bookings_for_room(conn, room_id, window))
    }
}
