pub mod amenity;
pub mod availability;
pub mod booking;
pub mod guest;
pub mod hotel;
pub mod room;
pub mod room_type;

pub use amenity::Amenity;
pub use availability::{
    AvailableRoom, BookedSpan, DailyAvailability, RoomTypeAvailability, RoomTypeInventory,
    RoomTypeSummary, StayRange, is_storable_date,
};
pub use booking::{Booking, BookingDetails, BookingStatus};
pub use guest::Guest;
pub use hotel::{Hotel, HotelOverview};
pub use room::{Room, RoomStatus, RoomWithType};
pub use room_type::RoomType;
