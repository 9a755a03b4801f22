//! Error handling
//!
//! Re-exports the shared error types and converts repository errors into
//! API errors with the matching [`ErrorCode`].
//!
//! # Example
//!
//! ```ignore
//! let category = repository::category::find_by_id(&state.db.pool, id)
//!     .await?
//!     .ok_or_else(|| AppError::not_found(format!("Category {id}")))?;
//! ```

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::db::repository::{Entity, RepoError};

fn not_found_code(entity: Entity) -> ErrorCode {
    match entity {
        Entity::Category => ErrorCode::CategoryNotFound,
        Entity::Restaurant => ErrorCode::RestaurantNotFound,
        Entity::Promotion => ErrorCode::PromotionNotFound,
        Entity::Schedule => ErrorCode::ScheduleNotFound,
        Entity::Booking => ErrorCode::BookingNotFound,
    }
}

fn duplicate_code(entity: Entity) -> ErrorCode {
    match entity {
        Entity::Category => ErrorCode::CategoryNameExists,
        Entity::Restaurant => ErrorCode::RestaurantNameExists,
        Entity::Promotion => ErrorCode::PromotionNameExists,
        Entity::Schedule => ErrorCode::ScheduleTimeExists,
        Entity::Booking => ErrorCode::AlreadyExists,
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        let message = err.to_string();
        match err {
            RepoError::NotFound(entity, id) => {
                AppError::with_message(not_found_code(entity), message).with_detail("id", id)
            }
            RepoError::Duplicate(entity, name) => {
                AppError::with_message(duplicate_code(entity), message).with_detail("name", name)
            }
            RepoError::Conflict(entity, id) => {
                AppError::with_message(ErrorCode::VersionConflict, message)
                    .with_detail("resource", entity.to_string())
                    .with_detail("id", id.to_string())
            }
            RepoError::InsufficientSeats {
                schedule_id,
                requested,
                available,
            } => AppError::with_message(ErrorCode::InsufficientSeats, message)
                .with_detail("schedule_id", schedule_id.to_string())
                .with_detail("requested", requested)
                .with_detail("available", available),
            RepoError::InvalidPeriod(_) => {
                AppError::with_message(ErrorCode::PromotionInvalidPeriod, message)
            }
            RepoError::InvalidPax(pax) => {
                AppError::with_message(ErrorCode::BookingInvalidPax, message).with_detail("pax", pax)
            }
            RepoError::ScheduleUnavailable(id) => {
                AppError::with_message(ErrorCode::ScheduleUnavailable, message)
                    .with_detail("schedule_id", id.to_string())
            }
            RepoError::CapacityBelowBooked { capacity, booked } => {
                AppError::with_message(ErrorCode::ScheduleCapacityBelowBooked, message)
                    .with_detail("capacity", capacity)
                    .with_detail("booked", booked)
            }
            RepoError::InUse(entity, _) => {
                let code = match entity {
                    Entity::Restaurant => ErrorCode::RestaurantHasSchedules,
                    _ => ErrorCode::CategoryInUse,
                };
                AppError::with_message(code, message)
            }
            RepoError::InvalidState(Entity::Booking, _) => {
                AppError::with_message(ErrorCode::BookingNotPending, message)
            }
            RepoError::InvalidState(_, _) => AppError::with_message(ErrorCode::InvalidRequest, message),
            RepoError::Validation(msg) => AppError::validation(msg),
            // Storage details stay in the log
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database operation failed");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}
