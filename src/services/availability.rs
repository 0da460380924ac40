use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;

use crate::db::HotelStore;
use crate::models::{
    AvailableRoom, DailyAvailability, RoomTypeAvailability, RoomTypeInventory, StayRange,
};

/// Answers which rooms are free for a stay.
///
/// Every call reads a fresh snapshot from the store; nothing is cached, so an
/// answer can be stale by the time a booking is written. Booking creation
/// re-checks under a write transaction (see `services::booking`).
///
/// Store failures come back as errors rather than empty results, so callers
/// can tell "fully booked" from "unknown". Either way a room must not be
/// treated as bookable.
#[derive(Clone)]
pub struct AvailabilityEngine {
    store: Arc<dyn HotelStore>,
}

impl AvailabilityEngine {
    pub fn new(store: Arc<dyn HotelStore>) -> Self {
        Self { store }
    }

    pub fn list_available_rooms(
        &self,
        hotel_id: &str,
        stay: &StayRange,
        room_type_id: Option<&str>,
    ) -> anyhow::Result<Vec<AvailableRoom>> {
        let rooms = self
            .store
            .operational_rooms(hotel_id, room_type_id)
            .with_context(|| format!("failed to load rooms for hotel {hotel_id}"))?;

        let bookings = self
            .store
            .hotel_bookings(hotel_id, stay)
            .with_context(|| format!("failed to load bookings for hotel {hotel_id}"))?;

        let booked: HashSet<&str> = bookings
            .iter()
            .filter(|b| b.blocks(stay))
            .map(|b| b.room_id.as_str())
            .collect();

        Ok(rooms
            .into_iter()
            .filter(|room| !booked.contains(room.id.as_str()))
            .collect())
    }

    /// Free rooms grouped by room type, in order of first appearance. Types
    /// with nothing free are left out.
    pub fn summarize_availability(
        &self,
        hotel_id: &str,
        stay: &StayRange,
    ) -> anyhow::Result<Vec<RoomTypeAvailability>> {
        let rooms = self.list_available_rooms(hotel_id, stay, None)?;

        let mut groups: Vec<RoomTypeAvailability> = Vec::new();
        for room in rooms {
            match groups.iter_mut().find(|g| g.room_type.id == room.room_type.id) {
                Some(group) => {
                    group.available_count += 1;
                    group.rooms.push(room);
                }
                None => groups.push(RoomTypeAvailability {
                    room_type: room.room_type.clone(),
                    available_count: 1,
                    rooms: vec![room],
                }),
            }
        }

        Ok(groups)
    }

    pub fn is_room_available(&self, room_id: &str, stay: &StayRange) -> anyhow::Result<bool> {
        let bookings = self
            .store
            .room_bookings(room_id, stay)
            .with_context(|| format!("failed to load bookings for room {room_id}"))?;

        Ok(!bookings
            .iter()
            .any(|b| b.room_id == room_id && b.blocks(stay)))
    }

    /// For each date, whether each room is free that night. The grid covers
    /// the hotel's operational rooms, narrowed to `room_ids` when given; ids
    /// of other hotels' rooms or of rooms out of service are left out.
    pub fn daily_availability(
        &self,
        hotel_id: &str,
        dates: &[NaiveDate],
        room_ids: Option<&[String]>,
    ) -> anyhow::Result<DailyAvailability> {
        let Some(window) = StayRange::spanning(dates) else {
            return Ok(DailyAvailability::new());
        };

        let room_ids: Vec<String> = self
            .store
            .operational_rooms(hotel_id, None)
            .with_context(|| format!("failed to load rooms for hotel {hotel_id}"))?
            .into_iter()
            .map(|room| room.id)
            .filter(|id| room_ids.map_or(true, |wanted| wanted.contains(id)))
            .collect();

        let bookings = self
            .store
            .hotel_bookings(hotel_id, &window)
            .with_context(|| format!("failed to load bookings for hotel {hotel_id}"))?;

        let mut grid = DailyAvailability::new();
        for date in dates {
            let night = StayRange::single_night(*date)
                .with_context(|| format!("date out of range: {date}"))?;

            let row: BTreeMap<String, bool> = room_ids
                .iter()
                .map(|room_id| {
                    let taken = bookings
                        .iter()
                        .any(|b| &b.room_id == room_id && b.blocks(&night));
                    (room_id.clone(), !taken)
                })
                .collect();

            grid.insert(*date, row);
        }

        Ok(grid)
    }

    /// Operational room count per room type for a hotel.
    pub fn room_inventory(&self, hotel_id: &str) -> anyhow::Result<Vec<RoomTypeInventory>> {
        let rooms = self
            .store
            .operational_rooms(hotel_id, None)
            .with_context(|| format!("failed to load rooms for hotel {hotel_id}"))?;

        let mut inventory: Vec<RoomTypeInventory> = Vec::new();
        for room in rooms {
            match inventory.iter_mut().find(|i| i.room_type.id == room.room_type.id) {
                Some(entry) => entry.total_rooms += 1,
                None => inventory.push(RoomTypeInventory {
                    room_type: room.room_type,
                    total_rooms: 1,
                }),
            }
        }

        Ok(inventory)
    }
}
