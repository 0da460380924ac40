use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amenity {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub notes: Option<String>,
}
