use serde::{Deserialize, Serialize};

use crate::models::RoomTypeSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_price: f64,
    pub max_occupancy: i32,
    pub number_of_couches: i32,
    pub has_stove: bool,
    pub has_microwave: bool,
    pub has_sink: bool,
    pub has_fridge: bool,
    pub has_mini_fridge: bool,
}

impl RoomType {
    pub fn summary(&self) -> RoomTypeSummary {
        RoomTypeSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            base_price: self.base_price,
            max_occupancy: self.max_occupancy,
        }
    }
}
