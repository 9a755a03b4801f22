//! Schedule Model (bookable time slot)

use serde::{Deserialize, Serialize};

use crate::version::VersionToken;

/// Schedule status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ScheduleStatus {
    /// Accepting bookings
    #[default]
    Available,
    /// No seats left
    Full,
    /// Retired by an administrator
    Unavailable,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Full => "FULL",
            Self::Unavailable => "UNAVAILABLE",
        }
    }

    /// Status after a write that leaves `available` seats.
    ///
    /// An explicit `Unavailable` always wins, and a retired slot stays
    /// retired unless the caller explicitly reopens it. Otherwise the
    /// status follows the seat counter.
    pub fn derive(requested: Option<Self>, current: Self, available: i32) -> Self {
        match (requested, current) {
            (Some(Self::Unavailable), _) => Self::Unavailable,
            (None, Self::Unavailable) => Self::Unavailable,
            _ if available <= 0 => Self::Full,
            _ => Self::Available,
        }
    }
}

/// Schedule entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Schedule {
    pub id: i64,
    pub restaurant_id: i64,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM (minute precision)
    pub start_time: String,
    pub capacity: i32,
    pub available_seats: i32,
    pub status: ScheduleStatus,
    pub version: VersionToken,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Schedule {
    /// Seats already handed out to bookings
    pub fn booked_seats(&self) -> i32 {
        self.capacity - self.available_seats
    }
}

/// Create schedule payload (restaurant comes from the path)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleCreate {
    pub date: String,
    pub start_time: String,
    pub capacity: i32,
}

/// Update schedule payload
///
/// `status` may only be `AVAILABLE` (reopen) or `UNAVAILABLE` (retire);
/// `FULL` is derived from the seat counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<ScheduleStatus>,
    pub version: VersionToken,
}

/// Retire payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRetire {
    pub version: VersionToken,
}

/// Query filter for schedule listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleQuery {
    pub date: Option<String>,
}

/// Result of deleting a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScheduleDeletion {
    /// No bookings referenced it, the row is gone
    Deleted { id: i64 },
    /// Bookings exist, the slot was retired instead
    Retired { schedule: Schedule },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_seat_counter() {
        use ScheduleStatus::*;
        assert_eq!(ScheduleStatus::derive(None, Available, 0), Full);
        assert_eq!(ScheduleStatus::derive(None, Full, 3), Available);
        assert_eq!(ScheduleStatus::derive(None, Available, 3), Available);
    }

    #[test]
    fn test_unavailable_is_sticky() {
        use ScheduleStatus::*;
        assert_eq!(ScheduleStatus::derive(None, Unavailable, 10), Unavailable);
        assert_eq!(
            ScheduleStatus::derive(Some(Unavailable), Available, 10),
            Unavailable
        );
        assert_eq!(
            ScheduleStatus::derive(Some(Available), Unavailable, 10),
            Available
        );
        assert_eq!(ScheduleStatus::derive(Some(Available), Unavailable, 0), Full);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&ScheduleStatus::Unavailable).unwrap();
        assert_eq!(json, "\"UNAVAILABLE\"");
        assert_eq!(ScheduleStatus::Full.as_str(), "FULL");
    }

    #[test]
    fn test_deletion_outcome_is_tagged() {
        let json = serde_json::to_value(ScheduleDeletion::Deleted { id: 9 }).unwrap();
        assert_eq!(json["outcome"], "deleted");
        assert_eq!(json["id"], 9);
    }
}
