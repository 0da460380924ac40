use serde::{Deserialize, Serialize};

use crate::models::RoomTypeSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub hotel_id: String,
    pub room_type_id: String,
    pub number: String,
    pub floor: Option<i32>,
    pub status: RoomStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Maintenance,
    OutOfOrder,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Maintenance => "maintenance",
            RoomStatus::OutOfOrder => "out_of_order",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(RoomStatus::Available),
            "maintenance" => Some(RoomStatus::Maintenance),
            "out_of_order" => Some(RoomStatus::OutOfOrder),
            _ => None,
        }
    }

    /// Only operational rooms are ever offered to guests.
    pub fn is_operational(&self) -> bool {
        matches!(self, RoomStatus::Available)
    }
}

/// Room listing row: the room plus a short description of its type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomWithType {
    #[serde(flatten)]
    pub room: Room,
    pub room_type: RoomTypeSummary,
}
