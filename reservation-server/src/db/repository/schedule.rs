//! Schedule Repository
//!
//! Seat counters are only ever decremented by the seat ledger. Admin
//! updates keep the number of booked seats fixed and recompute the rest.

use super::{Entity, RepoError, RepoResult, on_unique, parse_date, parse_start_time};
use crate::db::dedup::ensure_unique_slot;
use crate::db::guard::ConcurrentUpdateGuard;
use shared::VersionToken;
use shared::models::{Schedule, ScheduleCreate, ScheduleDeletion, ScheduleStatus, ScheduleUpdate};
use sqlx::SqlitePool;

const GUARD: ConcurrentUpdateGuard = ConcurrentUpdateGuard::new("schedule", Entity::Schedule);

const COLUMNS: &str = "id, restaurant_id, date, start_time, capacity, available_seats, status, version, created_at, updated_at";

pub async fn find_by_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
    date: Option<&str>,
) -> RepoResult<Vec<Schedule>> {
    let date = date.map(|d| parse_date(d, "date")).transpose()?;
    let sql = format!(
        "SELECT {COLUMNS} FROM schedule WHERE restaurant_id = ?1 AND (?2 IS NULL OR date = ?2) ORDER BY date, start_time"
    );
    let schedules = sqlx::query_as::<_, Schedule>(&sql)
        .bind(restaurant_id)
        .bind(date)
        .fetch_all(pool)
        .await?;
    Ok(schedules)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Schedule>> {
    let sql = format!("SELECT {COLUMNS} FROM schedule WHERE id = ?");
    let schedule = sqlx::query_as::<_, Schedule>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(schedule)
}

fn validate_capacity(capacity: i32) -> RepoResult<()> {
    if capacity < 1 {
        return Err(RepoError::Validation(format!(
            "capacity must be at least 1, got {capacity}"
        )));
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, restaurant_id: i64, data: ScheduleCreate) -> RepoResult<Schedule> {
    let restaurant: Option<i64> = sqlx::query_scalar("SELECT id FROM restaurant WHERE id = ?")
        .bind(restaurant_id)
        .fetch_optional(pool)
        .await?;
    if restaurant.is_none() {
        return Err(RepoError::NotFound(Entity::Restaurant, restaurant_id.to_string()));
    }

    let date = parse_date(&data.date, "date")?;
    let start_time = parse_start_time(&data.start_time)?;
    validate_capacity(data.capacity)?;
    ensure_unique_slot(pool, restaurant_id, &date, &start_time, None).await?;

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO schedule (id, restaurant_id, date, start_time, capacity, available_seats, status, version, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?6, ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(&date)
    .bind(&start_time)
    .bind(data.capacity)
    .bind(ScheduleStatus::Available)
    .bind(VersionToken::generate())
    .bind(now)
    .execute(pool)
    .await
    .map_err(on_unique(Entity::Schedule, &format!("{date} {start_time}")))?;

    tracing::info!(schedule_id = id, restaurant_id, %date, %start_time, capacity = data.capacity, "Schedule created");

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create schedule".into()))
}

/// Update date, time, capacity or status.
///
/// Booked seats (`capacity - available`) are preserved across capacity
/// changes. A booking that lands between the read and the write rotates
/// the version, so the write then fails with `Conflict`.
pub async fn update(pool: &SqlitePool, id: i64, data: ScheduleUpdate) -> RepoResult<Schedule> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Schedule, id.to_string()))?;
    GUARD.check(id, &current.version, &data.version)?;

    if data.status == Some(ScheduleStatus::Full) {
        return Err(RepoError::Validation(
            "status FULL is derived from available seats and cannot be set".into(),
        ));
    }

    let date = match data.date.as_deref() {
        Some(d) => parse_date(d, "date")?,
        None => current.date.clone(),
    };
    let start_time = match data.start_time.as_deref() {
        Some(t) => parse_start_time(t)?,
        None => current.start_time.clone(),
    };

    let capacity = data.capacity.unwrap_or(current.capacity);
    validate_capacity(capacity)?;
    let booked = current.booked_seats();
    if capacity < booked {
        return Err(RepoError::CapacityBelowBooked { capacity, booked });
    }
    let available = capacity - booked;
    let status = ScheduleStatus::derive(data.status, current.status, available);

    ensure_unique_slot(pool, current.restaurant_id, &date, &start_time, Some(id)).await?;

    let result = sqlx::query(
        "UPDATE schedule SET date = ?1, start_time = ?2, capacity = ?3, available_seats = ?4, status = ?5, \
         version = ?6, updated_at = ?7 WHERE id = ?8 AND version = ?9",
    )
    .bind(&date)
    .bind(&start_time)
    .bind(capacity)
    .bind(available)
    .bind(status)
    .bind(VersionToken::generate())
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(&data.version)
    .execute(pool)
    .await
    .map_err(on_unique(Entity::Schedule, &format!("{date} {start_time}")))?;
    GUARD.finish(pool, id, &result).await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Schedule, id.to_string()))
}

/// Stop the slot from accepting bookings. Existing bookings are kept.
pub async fn retire(pool: &SqlitePool, id: i64, version: &VersionToken) -> RepoResult<Schedule> {
    let result = sqlx::query(
        "UPDATE schedule SET status = ?1, version = ?2, updated_at = ?3 WHERE id = ?4 AND version = ?5",
    )
    .bind(ScheduleStatus::Unavailable)
    .bind(VersionToken::generate())
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(version)
    .execute(pool)
    .await?;
    GUARD.finish(pool, id, &result).await?;

    tracing::info!(schedule_id = id, "Schedule retired");

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Schedule, id.to_string()))
}

/// Hard-delete an unbooked slot, otherwise retire it.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<ScheduleDeletion> {
    // The NOT EXISTS keeps a booking that races the delete from being orphaned
    let result = sqlx::query(
        "DELETE FROM schedule WHERE id = ?1 \
         AND NOT EXISTS (SELECT 1 FROM booking_detail WHERE schedule_id = ?1)",
    )
    .bind(id)
    .execute(pool)
    .await?;
    if result.rows_affected() > 0 {
        tracing::info!(schedule_id = id, "Schedule deleted");
        return Ok(ScheduleDeletion::Deleted { id });
    }

    let result = sqlx::query("UPDATE schedule SET status = ?1, version = ?2, updated_at = ?3 WHERE id = ?4")
        .bind(ScheduleStatus::Unavailable)
        .bind(VersionToken::generate())
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(Entity::Schedule, id.to_string()));
    }

    tracing::info!(schedule_id = id, "Schedule has bookings, retired instead of deleted");
    let schedule = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Schedule, id.to_string()))?;
    Ok(ScheduleDeletion::Retired { schedule })
}
