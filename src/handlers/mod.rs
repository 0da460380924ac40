pub mod amenities;
pub mod availability;
pub mod bookings;
pub mod guests;
pub mod health;
pub mod hotels;
pub mod room_types;
pub mod rooms;

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::is_storable_date;

pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date format for {field}: {value}")))?;

    if !is_storable_date(date) {
        return Err(AppError::BadRequest(format!(
            "Date out of range for {field}: {value}"
        )));
    }
    Ok(date)
}

/// Missing or blank required string field.
pub(crate) fn required<'a>(value: &'a Option<String>) -> Option<&'a str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
