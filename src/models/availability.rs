use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::BookingStatus;

/// Dates the store can hold. Stored dates are `YYYY-MM-DD` text compared
/// byte-wise, which only orders correctly for four-digit years.
pub fn is_storable_date(date: NaiveDate) -> bool {
    (1..=9999).contains(&date.year())
}

/// A stay as a half-open range of calendar dates: the guest sleeps every
/// night from `check_in` up to, but not including, `check_out`.
///
/// Only built through the constructors below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StayRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayRange {
    /// Returns `None` unless `check_in` is strictly before `check_out` and
    /// both dates are storable.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Option<Self> {
        let storable = is_storable_date(check_in) && is_storable_date(check_out);
        (storable && check_in < check_out).then_some(Self {
            check_in,
            check_out,
        })
    }

    /// The one-night window `[date, date + 1 day)`.
    pub fn single_night(date: NaiveDate) -> Option<Self> {
        let next = date.checked_add_days(Days::new(1))?;
        Self::new(date, next)
    }

    /// Smallest range covering every date in `dates`, one night each.
    pub fn spanning(dates: &[NaiveDate]) -> Option<Self> {
        let first = dates.iter().min()?;
        let last = dates.iter().max()?;
        Self::new(*first, last.checked_add_days(Days::new(1))?)
    }

    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && self.check_out > other.check_in
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// The slice of a booking the engine needs to decide whether it blocks a room.
#[derive(Debug, Clone, PartialEq)]
pub struct BookedSpan {
    pub room_id: String,
    pub stay: StayRange,
    pub status: BookingStatus,
}

impl BookedSpan {
    /// Only active bookings hold a room; checked-out and cancelled never do.
    pub fn blocks(&self, stay: &StayRange) -> bool {
        self.status.is_active() && self.stay.overlaps(stay)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeSummary {
    pub id: String,
    pub name: String,
    pub base_price: f64,
    pub max_occupancy: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableRoom {
    pub id: String,
    pub number: String,
    pub floor: Option<i32>,
    pub room_type: RoomTypeSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeAvailability {
    pub room_type: RoomTypeSummary,
    pub available_count: usize,
    pub rooms: Vec<AvailableRoom>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeInventory {
    pub room_type: RoomTypeSummary,
    pub total_rooms: usize,
}

/// date -> room id -> free for that night.
pub type DailyAvailability = BTreeMap<NaiveDate, BTreeMap<String, bool>>;
