//! Unified error codes for the reservation platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Restaurant errors
//! - 2xxx: Category errors
//! - 3xxx: Promotion errors
//! - 4xxx: Schedule errors
//! - 5xxx: Booking errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can switch on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Submitted version token is stale
    VersionConflict = 10,

    // ==================== 1xxx: Restaurant ====================
    /// Restaurant not found
    RestaurantNotFound = 1001,
    /// Restaurant name already exists
    RestaurantNameExists = 1002,
    /// Restaurant still has schedules
    RestaurantHasSchedules = 1003,

    // ==================== 2xxx: Category ====================
    /// Category not found
    CategoryNotFound = 2001,
    /// Category name already exists
    CategoryNameExists = 2002,
    /// Category is referenced by restaurants
    CategoryInUse = 2003,

    // ==================== 3xxx: Promotion ====================
    /// Promotion not found
    PromotionNotFound = 3001,
    /// Promotion name already exists for this restaurant
    PromotionNameExists = 3002,
    /// Promotion period or discount is invalid
    PromotionInvalidPeriod = 3003,

    // ==================== 4xxx: Schedule ====================
    /// Schedule not found
    ScheduleNotFound = 4001,
    /// Another schedule already starts at this time
    ScheduleTimeExists = 4002,
    /// Schedule does not accept bookings
    ScheduleUnavailable = 4003,
    /// New capacity is below already booked seats
    ScheduleCapacityBelowBooked = 4004,

    // ==================== 5xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 5001,
    /// Not enough seats left on the schedule
    InsufficientSeats = 5002,
    /// Party size is invalid
    BookingInvalidPax = 5003,
    /// Booking is not pending
    BookingNotPending = 5004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Outgoing mail could not be delivered
    MailDeliveryFailed = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::VersionConflict => {
                "Resource was modified by someone else, reload and retry"
            }

            // Restaurant
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::RestaurantNameExists => "Restaurant name already exists",
            ErrorCode::RestaurantHasSchedules => "Restaurant still has schedules",

            // Category
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::CategoryInUse => "Category is used by restaurants",

            // Promotion
            ErrorCode::PromotionNotFound => "Promotion not found",
            ErrorCode::PromotionNameExists => "Promotion name already exists",
            ErrorCode::PromotionInvalidPeriod => "Promotion period is invalid",

            // Schedule
            ErrorCode::ScheduleNotFound => "Schedule not found",
            ErrorCode::ScheduleTimeExists => "A schedule already starts at this time",
            ErrorCode::ScheduleUnavailable => "Schedule is not accepting bookings",
            ErrorCode::ScheduleCapacityBelowBooked => {
                "Capacity cannot be lower than seats already booked"
            }

            // Booking
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::InsufficientSeats => "Not enough seats available",
            ErrorCode::BookingInvalidPax => "Party size must be at least one",
            ErrorCode::BookingNotPending => "Booking is not pending",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::MailDeliveryFailed => "Mail delivery failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            10 => Ok(ErrorCode::VersionConflict),

            // Restaurant
            1001 => Ok(ErrorCode::RestaurantNotFound),
            1002 => Ok(ErrorCode::RestaurantNameExists),
            1003 => Ok(ErrorCode::RestaurantHasSchedules),

            // Category
            2001 => Ok(ErrorCode::CategoryNotFound),
            2002 => Ok(ErrorCode::CategoryNameExists),
            2003 => Ok(ErrorCode::CategoryInUse),

            // Promotion
            3001 => Ok(ErrorCode::PromotionNotFound),
            3002 => Ok(ErrorCode::PromotionNameExists),
            3003 => Ok(ErrorCode::PromotionInvalidPeriod),

            // Schedule
            4001 => Ok(ErrorCode::ScheduleNotFound),
            4002 => Ok(ErrorCode::ScheduleTimeExists),
            4003 => Ok(ErrorCode::ScheduleUnavailable),
            4004 => Ok(ErrorCode::ScheduleCapacityBelowBooked),

            // Booking
            5001 => Ok(ErrorCode::BookingNotFound),
            5002 => Ok(ErrorCode::InsufficientSeats),
            5003 => Ok(ErrorCode::BookingInvalidPax),
            5004 => Ok(ErrorCode::BookingNotPending),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::MailDeliveryFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
