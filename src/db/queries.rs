use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{
    Amenity, AvailableRoom, BookedSpan, Booking, BookingDetails, BookingStatus, Guest, Hotel,
    HotelOverview, Room, RoomStatus, RoomType, RoomTypeSummary, RoomWithType, StayRange,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn active_statuses_sql() -> String {
    BookingStatus::ACTIVE
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).with_context(|| format!("invalid date in database: {s}"))
}

fn parse_datetime(s: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .with_context(|| format!("invalid timestamp in database: {s}"))
}

fn now_timestamp() -> String {
    Utc::now().naive_utc().format(DATETIME_FORMAT).to_string()
}

// ── Hotels ──

pub fn create_hotel(conn: &Connection, hotel: &Hotel) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO hotels (id, name, address, phone, email, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            hotel.id,
            hotel.name,
            hotel.address,
            hotel.phone,
            hotel.email,
            hotel.description,
            hotel.created_at.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_hotel(conn: &Connection, id: &str) -> anyhow::Result<Option<Hotel>> {
    let result = conn
        .query_row(
            "SELECT id, name, address, phone, email, description, created_at FROM hotels WHERE id = ?1",
            params![id],
            |row| Ok(parse_hotel_row(row)),
        )
        .optional()?;
    result.transpose()
}

pub fn list_hotels(conn: &Connection) -> anyhow::Result<Vec<HotelOverview>> {
    let mut stmt = conn.prepare(
        "SELECT h.id, h.name, h.address, h.phone, h.email, h.description, h.created_at,
                (SELECT COUNT(*) FROM rooms r WHERE r.hotel_id = h.id),
                (SELECT COUNT(*) FROM bookings b WHERE b.hotel_id = h.id)
         FROM hotels h ORDER BY h.name ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(parse_hotel_row(row).and_then(|hotel| {
            Ok(HotelOverview {
                hotel,
                room_count: row.get(7)?,
                booking_count: row.get(8)?,
            })
        }))
    })?;

    let mut hotels = vec![];
    for row in rows {
        hotels.push(row??);
    }
    Ok(hotels)
}

fn parse_hotel_row(row: &rusqlite::Row) -> anyhow::Result<Hotel> {
    let created_at: String = row.get(6)?;
    Ok(Hotel {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        description: row.get(5)?,
        created_at: parse_datetime(&created_at)?,
    })
}

// ── Guests ──

pub fn create_guest(conn: &Connection, guest: &Guest) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO guests (id, first_name, last_name, email, phone, address, date_of_birth, id_number, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            guest.id,
            guest.first_name,
            guest.last_name,
            guest.email,
            guest.phone,
            guest.address,
            guest.date_of_birth.map(|d| d.format(DATE_FORMAT).to_string()),
            guest.id_number,
            guest.created_at.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_guest(conn: &Connection, id: &str) -> anyhow::Result<Option<Guest>> {
    let result = conn
        .query_row(
            "SELECT id, first_name, last_name, email, phone, address, date_of_birth, id_number, created_at
             FROM guests WHERE id = ?1",
            params![id],
            |row| Ok(parse_guest_row(row)),
        )
        .optional()?;
    result.transpose()
}

pub fn list_guests(conn: &Connection) -> anyhow::Result<Vec<Guest>> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, email, phone, address, date_of_birth, id_number, created_at
         FROM guests ORDER BY created_at DESC, last_name ASC",
    )?;

    let rows = stmt.query_map([], |row| Ok(parse_guest_row(row)))?;

    let mut guests = vec![];
    for row in rows {
        guests.push(row??);
    }
    Ok(guests)
}

fn parse_guest_row(row: &rusqlite::Row) -> anyhow::Result<Guest> {
    let date_of_birth: Option<String> = row.get(6)?;
    let created_at: String = row.get(8)?;
    Ok(Guest {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        address: row.get(5)?,
        date_of_birth: date_of_birth.as_deref().map(parse_date).transpose()?,
        id_number: row.get(7)?,
        created_at: parse_datetime(&created_at)?,
    })
}

// ── Room Types ──

pub fn create_room_type(conn: &Connection, room_type: &RoomType) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO room_types (id, name, description, base_price, max_occupancy, number_of_couches,
                                 has_stove, has_microwave, has_sink, has_fridge, has_mini_fridge)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            room_type.id,
            room_type.name,
            room_type.description,
            room_type.base_price,
            room_type.max_occupancy,
            room_type.number_of_couches,
            room_type.has_stove as i32,
            room_type.has_microwave as i32,
            room_type.has_sink as i32,
            room_type.has_fridge as i32,
            room_type.has_mini_fridge as i32,
        ],
    )?;
    Ok(())
}

pub fn get_room_type(conn: &Connection, id: &str) -> anyhow::Result<Option<RoomType>> {
    let room_type = conn
        .query_row(
            "SELECT id, name, description, base_price, max_occupancy, number_of_couches,
                    has_stove, has_microwave, has_sink, has_fridge, has_mini_fridge
             FROM room_types WHERE id = ?1",
            params![id],
            parse_room_type_row,
        )
        .optional()?;
    Ok(room_type)
}

pub fn list_room_types(conn: &Connection) -> anyhow::Result<Vec<RoomType>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, base_price, max_occupancy, number_of_couches,
                has_stove, has_microwave, has_sink, has_fridge, has_mini_fridge
         FROM room_types ORDER BY base_price ASC, name ASC",
    )?;

    let rows = stmt.query_map([], parse_room_type_row)?;

    let mut room_types = vec![];
    for row in rows {
        room_types.push(row?);
    }
    Ok(room_types)
}

fn parse_room_type_row(row: &rusqlite::Row) -> rusqlite::Result<RoomType> {
    Ok(RoomType {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        base_price: row.get(3)?,
        max_occupancy: row.get(4)?,
        number_of_couches: row.get(5)?,
        has_stove: row.get::<_, i32>(6)? != 0,
        has_microwave: row.get::<_, i32>(7)? != 0,
        has_sink: row.get::<_, i32>(8)? != 0,
        has_fridge: row.get::<_, i32>(9)? != 0,
        has_mini_fridge: row.get::<_, i32>(10)? != 0,
    })
}

// ── Rooms ──

pub fn create_room(conn: &Connection, room: &Room) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO rooms (id, hotel_id, room_type_id, number, floor, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            room.id,
            room.hotel_id,
            room.room_type_id,
            room.number,
            room.floor,
            room.status.as_str(),
        ],
    )?;
    Ok(())
}

pub fn get_room(conn: &Connection, id: &str) -> anyhow::Result<Option<Room>> {
    let result = conn
        .query_row(
            "SELECT id, hotel_id, room_type_id, number, floor, status FROM rooms WHERE id = ?1",
            params![id],
            |row| Ok(parse_room_row(row)),
        )
        .optional()?;
    result.transpose()
}

pub fn list_rooms(conn: &Connection) -> anyhow::Result<Vec<RoomWithType>> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.hotel_id, r.room_type_id, r.number, r.floor, r.status,
                t.id, t.name, t.base_price, t.max_occupancy
         FROM rooms r JOIN room_types t ON t.id = r.room_type_id
         ORDER BY r.hotel_id ASC, r.number ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(parse_room_row(row).and_then(|room| {
            Ok(RoomWithType {
                room,
                room_type: RoomTypeSummary {
                    id: row.get(6)?,
                    name: row.get(7)?,
                    base_price: row.get(8)?,
                    max_occupancy: row.get(9)?,
                },
            })
        }))
    })?;

    let mut rooms = vec![];
    for row in rows {
        rooms.push(row??);
    }
    Ok(rooms)
}

pub fn update_room_status(conn: &Connection, id: &str, status: RoomStatus) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE rooms SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(count > 0)
}

/// Operational rooms of a hotel, each with its room type, ordered by room number.
pub fn operational_rooms(
    conn: &Connection,
    hotel_id: &str,
    room_type_id: Option<&str>,
) -> anyhow::Result<Vec<AvailableRoom>> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.number, r.floor, t.id, t.name, t.base_price, t.max_occupancy
         FROM rooms r JOIN room_types t ON t.id = r.room_type_id
         WHERE r.hotel_id = ?1
           AND r.status = ?2
           AND (?3 IS NULL OR r.room_type_id = ?3)
         ORDER BY r.number ASC",
    )?;

    let rows = stmt.query_map(
        params![hotel_id, RoomStatus::Available.as_str(), room_type_id],
        |row| {
            Ok(AvailableRoom {
                id: row.get(0)?,
                number: row.get(1)?,
                floor: row.get(2)?,
                room_type: RoomTypeSummary {
                    id: row.get(3)?,
                    name: row.get(4)?,
                    base_price: row.get(5)?,
                    max_occupancy: row.get(6)?,
                },
            })
        },
    )?;

    let mut rooms = vec![];
    for row in rows {
        rooms.push(row?);
    }
    Ok(rooms)
}

fn parse_room_row(row: &rusqlite::Row) -> anyhow::Result<Room> {
    let status_str: String = row.get(5)?;
    let status = RoomStatus::parse(&status_str)
        .with_context(|| format!("unknown room status: {status_str}"))?;

    Ok(Room {
        id: row.get(0)?,
        hotel_id: row.get(1)?,
        room_type_id: row.get(2)?,
        number: row.get(3)?,
        floor: row.get(4)?,
        status,
    })
}

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    let created_at = booking.created_at.format(DATETIME_FORMAT).to_string();
    let updated_at = booking.updated_at.format(DATETIME_FORMAT).to_string();

    conn.execute(
        "INSERT INTO bookings (id, room_id, hotel_id, guest_id, check_in, check_out, status, total_amount, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            booking.id,
            booking.room_id,
            booking.hotel_id,
            booking.guest_id,
            booking.check_in.format(DATE_FORMAT).to_string(),
            booking.check_out.format(DATE_FORMAT).to_string(),
            booking.status.as_str(),
            booking.total_amount,
            booking.notes,
            created_at,
            updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_booking(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn
        .query_row(
            "SELECT id, room_id, hotel_id, guest_id, check_in, check_out, status, total_amount, notes, created_at, updated_at
             FROM bookings WHERE id = ?1",
            params![id],
            |row| Ok(parse_booking_row(row)),
        )
        .optional()?;
    result.transpose()
}

pub fn list_bookings(conn: &Connection) -> anyhow::Result<Vec<BookingDetails>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.room_id, b.hotel_id, b.guest_id, b.check_in, b.check_out, b.status,
                b.total_amount, b.notes, b.created_at, b.updated_at,
                g.first_name || ' ' || g.last_name, r.number, t.name, h.name
         FROM bookings b
         JOIN guests g ON g.id = b.guest_id
         JOIN rooms r ON r.id = b.room_id
         JOIN room_types t ON t.id = r.room_type_id
         JOIN hotels h ON h.id = b.hotel_id
         ORDER BY b.created_at DESC, b.check_in DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(parse_booking_row(row).and_then(|booking| {
            Ok(BookingDetails {
                booking,
                guest_name: row.get(11)?,
                room_number: row.get(12)?,
                room_type_name: row.get(13)?,
                hotel_name: row.get(14)?,
            })
        }))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now_timestamp(), id],
    )?;
    Ok(count > 0)
}

/// Active bookings of a hotel whose stay intersects `window`.
pub fn active_bookings_for_hotel(
    conn: &Connection,
    hotel_id: &str,
    window: &StayRange,
) -> anyhow::Result<Vec<BookedSpan>> {
    let sql = format!(
        "SELECT room_id, check_in, check_out, status FROM bookings
         WHERE hotel_id = ?1 AND status IN ({}) AND check_in < ?2 AND check_out > ?3",
        active_statuses_sql()
    );
    query_spans(conn, &sql, hotel_id, window)
}

/// Active bookings of one room whose stay intersects `window`.
pub fn active_bookings_for_room(
    conn: &Connection,
    room_id: &str,
    window: &StayRange,
) -> anyhow::Result<Vec<BookedSpan>> {
    let sql = format!(
        "SELECT room_id, check_in, check_out, status FROM bookings
         WHERE room_id = ?1 AND status IN ({}) AND check_in < ?2 AND check_out > ?3",
        active_statuses_sql()
    );
    query_spans(conn, &sql, room_id, window)
}

fn query_spans(
    conn: &Connection,
    sql: &str,
    key: &str,
    window: &StayRange,
) -> anyhow::Result<Vec<BookedSpan>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(
        params![
            key,
            window.check_out.format(DATE_FORMAT).to_string(),
            window.check_in.format(DATE_FORMAT).to_string(),
        ],
        |row| Ok(parse_span_row(row)),
    )?;

    let mut spans = vec![];
    for row in rows {
        spans.push(row??);
    }
    Ok(spans)
}

fn parse_span_row(row: &rusqlite::Row) -> anyhow::Result<BookedSpan> {
    let room_id: String = row.get(0)?;
    let check_in = parse_date(&row.get::<_, String>(1)?)?;
    let check_out = parse_date(&row.get::<_, String>(2)?)?;
    let status_str: String = row.get(3)?;

    Ok(BookedSpan {
        room_id,
        stay: StayRange::new(check_in, check_out)
            .with_context(|| format!("booking stay {check_in}..{check_out} is empty"))?,
        status: BookingStatus::parse(&status_str)
            .with_context(|| format!("unknown booking status: {status_str}"))?,
    })
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let status_str: String = row.get(6)?;
    let created_at_str: String = row.get(9)?;
    let updated_at_str: String = row.get(10)?;

    Ok(Booking {
        id: row.get(0)?,
        room_id: row.get(1)?,
        hotel_id: row.get(2)?,
        guest_id: row.get(3)?,
        check_in: parse_date(&row.get::<_, String>(4)?)?,
        check_out: parse_date(&row.get::<_, String>(5)?)?,
        status: BookingStatus::parse(&status_str)
            .with_context(|| format!("unknown booking status: {status_str}"))?,
        total_amount: row.get(7)?,
        notes: row.get(8)?,
        created_at: parse_datetime(&created_at_str)?,
        updated_at: parse_datetime(&updated_at_str)?,
    })
}

// ── Amenities ──

pub fn create_amenity(conn: &Connection, amenity: &Amenity) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO amenities (id, name, price, notes) VALUES (?1, ?2, ?3, ?4)",
        params![amenity.id, amenity.name, amenity.price, amenity.notes],
    )?;
    Ok(())
}

pub fn list_amenities(conn: &Connection) -> anyhow::Result<Vec<Amenity>> {
    let mut stmt =
        conn.prepare("SELECT id, name, price, notes FROM amenities ORDER BY price ASC, name ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(Amenity {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            notes: row.get(3)?,
        })
    })?;

    let mut amenities = vec![];
    for row in rows {
        amenities.push(row?);
    }
    Ok(amenities)
}
