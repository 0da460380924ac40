use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/hotels",
            get(handlers::hotels::list_hotels).post(handlers::hotels::create_hotel),
        )
        .route(
            "/api/hotels/:id/inventory",
            get(handlers::hotels::room_inventory),
        )
        .route(
            "/api/guests",
            get(handlers::guests::list_guests).post(handlers::guests::create_guest),
        )
        .route(
            "/api/room-types",
            get(handlers::room_types::list_room_types).post(handlers::room_types::create_room_type),
        )
        .route(
            "/api/rooms",
            get(handlers::rooms::list_rooms).post(handlers::rooms::create_room),
        )
        .route(
            "/api/rooms/availability",
            get(handlers::availability::available_rooms)
                .post(handlers::availability::availability_summary),
        )
        .route(
            "/api/rooms/daily-availability",
            post(handlers::availability::daily_availability),
        )
        .route(
            "/api/rooms/:id/status",
            post(handlers::rooms::update_room_status),
        )
        .route(
            "/api/amenities",
            get(handlers::amenities::list_amenities).post(handlers::amenities::create_amenity),
        )
        .route(
            "/api/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route("/api/bookings/:id", get(handlers::bookings::get_booking))
        .route(
            "/api/bookings/:id/status",
            post(handlers::bookings::update_booking_status),
        )
        .with_state(state)
}
