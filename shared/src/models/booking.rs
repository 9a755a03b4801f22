//! Booking Model

use serde::{Deserialize, Serialize};

/// Booking status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum BookingStatus {
    /// Seats reserved, guest has not shown up yet
    #[default]
    Pending,
    /// Guest was seated
    Complete,
    /// Slot started without the booking being completed
    Expired,
}

/// Booking entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    /// Human-readable reference, `BK-YYYYMMDD-XXXXXX`
    pub booking_no: String,
    pub user_id: i64,
    pub contact_name: String,
    pub contact_email: String,
    /// Total party size across details
    pub pax: i32,
    pub status: BookingStatus,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub details: Vec<BookingDetail>,
}

/// Seats taken from one schedule by a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BookingDetail {
    pub id: i64,
    pub booking_id: i64,
    pub schedule_id: i64,
    pub pax: i32,
    pub created_at: i64,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub user_id: i64,
    pub schedule_id: i64,
    pub pax: i32,
    pub contact_name: String,
    pub contact_email: String,
}

/// Query filter for booking listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingQuery {
    pub user_id: i64,
}
