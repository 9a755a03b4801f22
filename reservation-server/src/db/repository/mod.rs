//! Repository Module
//!
//! Free-function CRUD over the SQLite pool, one file per table.

pub mod booking;
pub mod category;
pub mod promotion;
pub mod restaurant;
pub mod schedule;

use std::fmt;
use thiserror::Error;

/// Entity kinds, used to pick error codes and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Category,
    Restaurant,
    Promotion,
    Schedule,
    Booking,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Category => "Category",
            Entity::Restaurant => "Restaurant",
            Entity::Promotion => "Promotion",
            Entity::Schedule => "Schedule",
            Entity::Booking => "Booking",
        };
        f.write_str(name)
    }
}

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0} {1} not found")]
    NotFound(Entity, String),

    #[error("{0} '{1}' already exists")]
    Duplicate(Entity, String),

    /// Submitted version token no longer matches the stored one
    #[error("{0} {1} was modified concurrently")]
    Conflict(Entity, i64),

    #[error("Schedule {schedule_id}: requested {requested} seats, {available} available")]
    InsufficientSeats {
        schedule_id: i64,
        requested: i32,
        available: i32,
    },

    #[error("Invalid promotion period: {0}")]
    InvalidPeriod(String),

    #[error("Party size must be at least 1, got {0}")]
    InvalidPax(i32),

    #[error("Schedule {0} is not accepting bookings")]
    ScheduleUnavailable(i64),

    #[error("Capacity {capacity} is below {booked} booked seats")]
    CapacityBelowBooked { capacity: i32, booked: i32 },

    #[error("{0} is still in use: {1}")]
    InUse(Entity, String),

    #[error("{0} in invalid state: {1}")]
    InvalidState(Entity, String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse a `YYYY-MM-DD` date and return it in canonical form.
pub(crate) fn parse_date(value: &str, field: &str) -> RepoResult<String> {
    chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| RepoError::Validation(format!("{field} must be a YYYY-MM-DD date")))
}

/// Parse `HH:MM` or `HH:MM:SS` and truncate to the minute.
pub(crate) fn parse_start_time(value: &str) -> RepoResult<String> {
    let value = value.trim();
    chrono::NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| chrono::NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| RepoError::Validation("start_time must be HH:MM".into()))
}

/// Map a unique-index violation to `Duplicate(entity, name)`.
///
/// The unique indexes back up the duplicate pre-checks when two writers race.
pub(crate) fn on_unique(entity: Entity, name: &str) -> impl FnOnce(sqlx::Error) -> RepoError + '_ {
    move |err| match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepoError::Duplicate(entity, name.to_string())
        }
        _ => RepoError::from(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2030-01-05 ", "date").unwrap(), "2030-01-05");
        assert!(parse_date("2030-02-30", "date").is_err());
        assert!(parse_date("05/01/2030", "date").is_err());
    }

    #[test]
    fn test_parse_start_time_truncates_to_minutes() {
        assert_eq!(parse_start_time("18:30").unwrap(), "18:30");
        assert_eq!(parse_start_time("18:30:59").unwrap(), "18:30");
        assert!(parse_start_time("25:00").is_err());
        assert!(parse_start_time("evening").is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = RepoError::InsufficientSeats {
            schedule_id: 3,
            requested: 20,
            available: 15,
        };
        assert_eq!(err.to_string(), "Schedule 3: requested 20 seats, 15 available");
        assert_eq!(
            RepoError::Duplicate(Entity::Category, "chicken".into()).to_string(),
            "Category 'chicken' already exists"
        );
    }
}
