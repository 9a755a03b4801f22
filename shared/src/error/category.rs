//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Restaurant errors
/// - 2xxx: Category errors
/// - 3xxx: Promotion errors
/// - 4xxx: Schedule errors
/// - 5xxx: Booking errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Restaurant errors (1xxx)
    Restaurant,
    /// Category errors (2xxx)
    Category,
    /// Promotion errors (3xxx)
    Promotion,
    /// Schedule errors (4xxx)
    Schedule,
    /// Booking errors (5xxx)
    Booking,
    /// System errors (9xxx and unassigned ranges)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Restaurant,
            2000..3000 => Self::Category,
            3000..4000 => Self::Promotion,
            4000..5000 => Self::Schedule,
            5000..6000 => Self::Booking,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Restaurant => "restaurant",
            Self::Category => "category",
            Self::Promotion => "promotion",
            Self::Schedule => "schedule",
            Self::Booking => "booking",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(10), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Restaurant);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Category);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Promotion);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Schedule);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Booking);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(7000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::VersionConflict.category(), ErrorCategory::General);
        assert_eq!(
            ErrorCode::RestaurantHasSchedules.category(),
            ErrorCategory::Restaurant
        );
        assert_eq!(ErrorCode::CategoryInUse.category(), ErrorCategory::Category);
        assert_eq!(
            ErrorCode::ScheduleUnavailable.category(),
            ErrorCategory::Schedule
        );
        assert_eq!(
            ErrorCode::InsufficientSeats.category(),
            ErrorCategory::Booking
        );
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&ErrorCategory::Schedule).unwrap();
        assert_eq!(json, "\"schedule\"");

        let category: ErrorCategory = serde_json::from_str("\"booking\"").unwrap();
        assert_eq!(category, ErrorCategory::Booking);
        assert_eq!(category.name(), "booking");
    }
}
