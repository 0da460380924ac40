use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use innkeeper::config::AppConfig;
use innkeeper::db;
use innkeeper::routes;
use innkeeper::state::AppState;

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
    }
}

fn test_state() -> Arc<AppState> {
    let conn = db::init_db(":memory:").unwrap();
    Arc::new(AppState::new(conn, test_config()))
}

fn test_app(state: Arc<AppState>) -> Router {
    routes::router(state)
}

/// A date `days` from today, as the API expects it.
fn day(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

async fn send(state: &Arc<AppState>, req: Request<Body>) -> (StatusCode, Value) {
    let res = test_app(state.clone()).oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    send(
        state,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

async fn post(state: &Arc<AppState>, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        state,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

struct Fixture {
    hotel_id: String,
    queen_id: String,
    king_id: String,
    rooms: Vec<String>,
    guest_id: String,
}

/// Hotel with rooms 21, 22 (Queen) and 23 (King), plus one guest.
async fn seed(state: &Arc<AppState>) -> Fixture {
    let (status, hotel) = post(
        state,
        "/api/hotels",
        json!({
            "name": "Copper River Motel",
            "address": "4113 BC-16, Terrace, BC V8G 1J7",
            "phone": "1-250-635-6124"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let hotel_id = hotel["id"].as_str().unwrap().to_string();

    let (status, queen) = post(
        state,
        "/api/room-types",
        json!({ "name": "1 Queen Room", "basePrice": 120.0, "maxOccupancy": 2, "hasMicrowave": true }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let queen_id = queen["id"].as_str().unwrap().to_string();

    let (_, king) = post(
        state,
        "/api/room-types",
        json!({ "name": "1 King Room", "basePrice": 140.0, "maxOccupancy": 2 }),
    )
    .await;
    let king_id = king["id"].as_str().unwrap().to_string();

    let mut rooms = vec![];
    for (number, room_type) in [("21", &queen_id), ("22", &queen_id), ("23", &king_id)] {
        let (status, room) = post(
            state,
            "/api/rooms",
            json!({ "number": number, "floor": 1, "hotelId": hotel_id, "roomTypeId": room_type }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        rooms.push(room["id"].as_str().unwrap().to_string());
    }

    let (status, guest) = post(
        state,
        "/api/guests",
        json!({ "firstName": "Alice", "lastName": "Smith", "email": "alice@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let guest_id = guest["id"].as_str().unwrap().to_string();

    Fixture {
        hotel_id,
        queen_id,
        king_id,
        rooms,
        guest_id,
    }
}

async fn book(state: &Arc<AppState>, f: &Fixture, room: usize, from: i64, to: i64) -> (StatusCode, Value) {
    post(
        state,
        "/api/bookings",
        json!({
            "hotelId": f.hotel_id,
            "roomId": f.rooms[room],
            "guestId": f.guest_id,
            "checkIn": day(from),
            "checkOut": day(to),
        }),
    )
    .await
}

fn room_ids(json: &Value) -> Vec<String> {
    let mut ids: Vec<String> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let state = test_state();
    let (status, json) = get(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

// ── Availability ──

#[tokio::test]
async fn test_all_rooms_free_without_bookings() {
    let state = test_state();
    let f = seed(&state).await;

    let uri = format!(
        "/api/rooms/availability?hotelId={}&checkIn={}&checkOut={}",
        f.hotel_id,
        day(10),
        day(13)
    );
    let (status, json) = get(&state, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(room_ids(&json), sorted(f.rooms.clone()));
    assert!(json[0]["roomType"]["basePrice"].is_number());
}

#[tokio::test]
async fn test_booked_room_is_excluded_only_while_overlapping() {
    let state = test_state();
    let f = seed(&state).await;

    let (status, _) = book(&state, &f, 0, 10, 13).await;
    assert_eq!(status, StatusCode::CREATED);

    let check = |from: i64, to: i64| {
        format!(
            "/api/rooms/availability?hotelId={}&checkIn={}&checkOut={}",
            f.hotel_id,
            day(from),
            day(to)
        )
    };

    // Overlapping stay: room 21 is gone
    let (_, json) = get(&state, &check(9, 11)).await;
    assert_eq!(room_ids(&json), sorted(vec![f.rooms[1].clone(), f.rooms[2].clone()]));

    // Same-day turnover on either side
    let (_, json) = get(&state, &check(8, 10)).await;
    assert_eq!(room_ids(&json), sorted(f.rooms.clone()));
    let (_, json) = get(&state, &check(13, 15)).await;
    assert_eq!(room_ids(&json), sorted(f.rooms.clone()));
}

#[tokio::test]
async fn test_room_type_filter() {
    let state = test_state();
    let f = seed(&state).await;

    let uri = format!(
        "/api/rooms/availability?hotelId={}&checkIn={}&checkOut={}&roomTypeId={}",
        f.hotel_id,
        day(1),
        day(2),
        f.king_id
    );
    let (status, json) = get(&state, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(room_ids(&json), vec![f.rooms[2].clone()]);
}

#[tokio::test]
async fn test_availability_rejects_bad_input() {
    let state = test_state();
    let f = seed(&state).await;

    let cases = [
        format!("/api/rooms/availability?hotelId={}", f.hotel_id),
        format!(
            "/api/rooms/availability?hotelId={}&checkIn=tomorrow&checkOut={}",
            f.hotel_id,
            day(3)
        ),
        format!(
            "/api/rooms/availability?hotelId={}&checkIn={}&checkOut={}",
            f.hotel_id,
            day(5),
            day(5)
        ),
        format!(
            "/api/rooms/availability?hotelId={}&checkIn={}&checkOut={}",
            f.hotel_id,
            day(5),
            day(3)
        ),
        format!(
            "/api/rooms/availability?hotelId={}&checkIn={}&checkOut={}",
            f.hotel_id,
            day(-2),
            day(3)
        ),
    ];

    for uri in cases {
        let (status, json) = get(&state, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn test_out_of_service_room_never_offered() {
    let state = test_state();
    let f = seed(&state).await;

    let (status, _) = post(
        &state,
        &format!("/api/rooms/{}/status", f.rooms[1]),
        json!({ "status": "out_of_order" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!(
        "/api/rooms/availability?hotelId={}&checkIn={}&checkOut={}",
        f.hotel_id,
        day(1),
        day(30)
    );
    let (_, json) = get(&state, &uri).await;
    assert!(!room_ids(&json).contains(&f.rooms[1]));
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_summary_groups_by_room_type() {
    let state = test_state();
    let f = seed(&state).await;

    // King room taken, one Queen taken
    book(&state, &f, 2, 5, 8).await;
    book(&state, &f, 0, 5, 8).await;

    let (status, json) = post(
        &state,
        "/api/rooms/availability",
        json!({ "hotelId": f.hotel_id, "checkIn": day(6), "checkOut": day(7) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let groups = json.as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["roomType"]["id"], f.queen_id.as_str());
    assert_eq!(groups[0]["availableCount"], 1);
    assert_eq!(groups[0]["rooms"][0]["id"], f.rooms[1].as_str());
}

#[tokio::test]
async fn test_daily_availability_grid() {
    let state = test_state();
    let f = seed(&state).await;

    book(&state, &f, 0, 10, 13).await;

    let dates: Vec<String> = (9..=13).map(day).collect();
    let (status, json) = post(
        &state,
        "/api/rooms/daily-availability",
        json!({ "hotelId": f.hotel_id, "dates": dates, "roomIds": [f.rooms[0], f.rooms[1]] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let room = f.rooms[0].as_str();
    assert_eq!(json[day(9)][room], true);
    assert_eq!(json[day(10)][room], false);
    assert_eq!(json[day(12)][room], false);
    assert_eq!(json[day(13)][room], true);
    for date in &dates {
        assert_eq!(json[date][f.rooms[1].as_str()], true);
    }
}

#[tokio::test]
async fn test_daily_availability_requires_dates() {
    let state = test_state();
    let f = seed(&state).await;

    let (status, _) = post(
        &state,
        "/api/rooms/daily-availability",
        json!({ "hotelId": f.hotel_id }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &state,
        "/api/rooms/daily-availability",
        json!({ "hotelId": f.hotel_id, "dates": ["06/10/2024"] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_room_inventory() {
    let state = test_state();
    let f = seed(&state).await;

    let (status, json) = get(&state, &format!("/api/hotels/{}/inventory", f.hotel_id)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    let queen = entries
        .iter()
        .find(|e| e["roomType"]["id"] == f.queen_id.as_str())
        .unwrap();
    assert_eq!(queen["totalRooms"], 2);

    let (status, _) = get(&state, "/api/hotels/nope/inventory").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Bookings ──

#[tokio::test]
async fn test_create_booking_computes_total() {
    let state = test_state();
    let f = seed(&state).await;

    let (status, json) = book(&state, &f, 0, 10, 13).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["status"], "pending");
    assert_eq!(json["totalAmount"], 360.0);
    assert_eq!(json["checkIn"], day(10));

    let (status, fetched) = get(&state, &format!("/api/bookings/{}", json["id"].as_str().unwrap())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["roomId"], f.rooms[0].as_str());
}

#[tokio::test]
async fn test_overlapping_booking_rejected() {
    let state = test_state();
    let f = seed(&state).await;

    let (status, _) = book(&state, &f, 0, 10, 13).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = book(&state, &f, 0, 12, 15).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("already booked"));

    // Turnover day is fine
    let (status, _) = book(&state, &f, 0, 13, 15).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_cancelled_booking_frees_room() {
    let state = test_state();
    let f = seed(&state).await;

    let (_, booking) = book(&state, &f, 0, 10, 13).await;
    let id = booking["id"].as_str().unwrap();

    let (status, json) = post(
        &state,
        &format!("/api/bookings/{id}/status"),
        json!({ "status": "cancelled" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "cancelled");

    let uri = format!(
        "/api/rooms/availability?hotelId={}&checkIn={}&checkOut={}",
        f.hotel_id,
        day(10),
        day(13)
    );
    let (_, json) = get(&state, &uri).await;
    assert!(room_ids(&json).contains(&f.rooms[0]));

    let (status, _) = book(&state, &f, 0, 10, 13).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_invalid_status_transition() {
    let state = test_state();
    let f = seed(&state).await;

    let (_, booking) = book(&state, &f, 0, 10, 13).await;
    let id = booking["id"].as_str().unwrap();

    let (status, _) = post(
        &state,
        &format!("/api/bookings/{id}/status"),
        json!({ "status": "checked_out" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &state,
        "/api/bookings/missing/status",
        json!({ "status": "confirmed" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_validation() {
    let state = test_state();
    let f = seed(&state).await;

    let (status, _) = post(&state, "/api/bookings", json!({ "roomId": f.rooms[0] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = book(&state, &f, 0, 13, 10).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &state,
        "/api/bookings",
        json!({
            "hotelId": f.hotel_id,
            "roomId": "no-such-room",
            "guestId": f.guest_id,
            "checkIn": day(1),
            "checkOut": day(2),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_bookings_includes_names() {
    let state = test_state();
    let f = seed(&state).await;
    book(&state, &f, 1, 3, 5).await;

    let (status, json) = get(&state, "/api/bookings").await;
    assert_eq!(status, StatusCode::OK);
    let bookings = json.as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["guestName"], "Alice Smith");
    assert_eq!(bookings[0]["roomNumber"], "22");
    assert_eq!(bookings[0]["roomTypeName"], "1 Queen Room");
    assert_eq!(bookings[0]["hotelName"], "Copper River Motel");
}

// ── Reference data ──

#[tokio::test]
async fn test_guest_validation_and_duplicates() {
    let state = test_state();
    seed(&state).await;

    let (status, json) = post(&state, "/api/guests", json!({ "firstName": "Bob" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "First name, last name, and email are required");

    let (status, json) = post(
        &state,
        "/api/guests",
        json!({ "firstName": "Al", "lastName": "Smith", "email": "alice@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "Email already exists");

    let (status, json) = get(&state, "/api/guests").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_room_number_rejected() {
    let state = test_state();
    let f = seed(&state).await;

    let (status, _) = post(
        &state,
        "/api/rooms",
        json!({ "number": "21", "hotelId": f.hotel_id, "roomTypeId": f.queen_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post(
        &state,
        "/api/rooms",
        json!({ "number": "99", "hotelId": "nope", "roomTypeId": f.queen_id }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_hotels_room_types_and_amenities_lists() {
    let state = test_state();
    let f = seed(&state).await;
    book(&state, &f, 0, 1, 2).await;

    let (_, json) = get(&state, "/api/hotels").await;
    assert_eq!(json[0]["roomCount"], 3);
    assert_eq!(json[0]["bookingCount"], 1);

    let (_, json) = get(&state, "/api/room-types").await;
    let prices: Vec<f64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["basePrice"].as_f64().unwrap())
        .collect();
    assert_eq!(prices, vec![120.0, 140.0]);

    post(&state, "/api/amenities", json!({ "name": "Parking", "price": 10.0 })).await;
    post(&state, "/api/amenities", json!({ "name": "High-Speed WiFi" })).await;
    let (_, json) = get(&state, "/api/amenities").await;
    assert_eq!(json[0]["name"], "High-Speed WiFi");
    assert_eq!(json[1]["name"], "Parking");

    let (_, json) = get(&state, "/api/rooms").await;
    assert_eq!(json.as_array().unwrap().len(), 3);
    assert!(json[0]["roomType"]["name"].is_string());
}

#[tokio::test]
async fn test_years_past_9999_are_rejected() {
    let state = test_state();
    let f = seed(&state).await;
    book(&state, &f, 0, 10, 13).await;

    let (status, _) = post(
        &state,
        "/api/rooms/availability",
        json!({ "hotelId": f.hotel_id, "checkIn": day(11), "checkOut": "+10000-01-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &state,
        "/api/bookings",
        json!({
            "hotelId": f.hotel_id,
            "roomId": f.rooms[0],
            "guestId": f.guest_id,
            "checkIn": day(30),
            "checkOut": "+10000-01-01",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &state,
        "/api/rooms/daily-availability",
        json!({ "hotelId": f.hotel_id, "dates": ["9999-12-31"] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A long stay that stays within four-digit years still sees the booking.
    let (status, json) = post(
        &state,
        "/api/rooms/availability",
        json!({ "hotelId": f.hotel_id, "checkIn": day(11), "checkOut": "9999-12-31" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let queen = &json.as_array().unwrap()[0];
    assert_eq!(queen["availableCount"], 1);
    assert_eq!(queen["rooms"][0]["id"], f.rooms[1].as_str());
}

#[tokio::test]
async fn test_daily_grid_ignores_rooms_of_other_hotels() {
    let state = test_state();
    let f = seed(&state).await;

    let (_, other) = post(&state, "/api/hotels", json!({ "name": "Skeena Lodge" })).await;
    let other_hotel = other["id"].as_str().unwrap();
    let (_, room) = post(
        &state,
        "/api/rooms",
        json!({ "number": "1", "hotelId": other_hotel, "roomTypeId": f.queen_id }),
    )
    .await;
    let other_room = room["id"].as_str().unwrap();
    let (status, _) = post(
        &state,
        "/api/bookings",
        json!({
            "hotelId": other_hotel,
            "roomId": other_room,
            "guestId": f.guest_id,
            "checkIn": day(10),
            "checkOut": day(13),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = post(
        &state,
        "/api/rooms/daily-availability",
        json!({ "hotelId": f.hotel_id, "dates": [day(11)], "roomIds": [f.rooms[0], other_room] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let row = json[day(11)].as_object().unwrap();
    assert_eq!(row.len(), 1);
    assert_eq!(row[f.rooms[0].as_str()], true);
    assert!(row.get(other_room).is_none());
}
