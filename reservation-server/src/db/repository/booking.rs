//! Booking Repository

use std::collections::HashMap;

use super::{Entity, RepoError, RepoResult};
use chrono::Local;
use rand::Rng;
use rand::distributions::Alphanumeric;
use shared::models::{Booking, BookingCreate, BookingDetail, BookingStatus};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, booking_no, user_id, contact_name, contact_email, pax, status, created_at, updated_at";

/// Attempts at drawing an unused booking number before giving up
const BOOKING_NO_ATTEMPTS: usize = 5;

/// `BK-YYYYMMDD-XXXXXX`, six random uppercase alphanumerics
fn generate_booking_no() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("BK-{}-{suffix}", Local::now().format("%Y%m%d"))
}

/// Insert a `PENDING` booking on the caller's transaction.
///
/// Seats are not touched here; the caller reserves them through the
/// seat ledger on the same connection before committing.
pub async fn insert(conn: &mut SqliteConnection, data: &BookingCreate) -> RepoResult<Booking> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let contact_name = data.contact_name.trim();
    let contact_email = data.contact_email.trim();

    for _ in 0..BOOKING_NO_ATTEMPTS {
        let booking_no = generate_booking_no();
        let inserted = sqlx::query(
            "INSERT INTO booking (id, booking_no, user_id, contact_name, contact_email, pax, status, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        )
        .bind(id)
        .bind(&booking_no)
        .bind(data.user_id)
        .bind(contact_name)
        .bind(contact_email)
        .bind(data.pax)
        .bind(BookingStatus::Pending)
        .bind(now)
        .execute(&mut *conn)
        .await;

        match inserted {
            Ok(_) => {
                return Ok(Booking {
                    id,
                    booking_no,
                    user_id: data.user_id,
                    contact_name: contact_name.to_string(),
                    contact_email: contact_email.to_string(),
                    pax: data.pax,
                    status: BookingStatus::Pending,
                    created_at: now,
                    updated_at: now,
                    details: Vec::new(),
                });
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::debug!(%booking_no, "Booking number collision, drawing another");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(RepoError::Database(
        "Could not allocate a unique booking number".into(),
    ))
}

async fn details_for(pool: &SqlitePool, booking_id: i64) -> RepoResult<Vec<BookingDetail>> {
    let details = sqlx::query_as::<_, BookingDetail>(
        "SELECT id, booking_id, schedule_id, pax, created_at FROM booking_detail WHERE booking_id = ? ORDER BY created_at, id",
    )
    .bind(booking_id)
    .fetch_all(pool)
    .await?;
    Ok(details)
}

async fn with_details(pool: &SqlitePool, booking: Option<Booking>) -> RepoResult<Option<Booking>> {
    match booking {
        Some(mut booking) => {
            booking.details = details_for(pool, booking.id).await?;
            Ok(Some(booking))
        }
        None => Ok(None),
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Booking>> {
    let sql = format!("SELECT {COLUMNS} FROM booking WHERE id = ?");
    let booking = sqlx::query_as::<_, Booking>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    with_details(pool, booking).await
}

pub async fn find_by_number(pool: &SqlitePool, booking_no: &str) -> RepoResult<Option<Booking>> {
    let sql = format!("SELECT {COLUMNS} FROM booking WHERE booking_no = ?");
    let booking = sqlx::query_as::<_, Booking>(&sql)
        .bind(booking_no.trim())
        .fetch_optional(pool)
        .await?;
    with_details(pool, booking).await
}

/// All bookings of a user, newest first, with their details.
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Booking>> {
    let sql = format!("SELECT {COLUMNS} FROM booking WHERE user_id = ? ORDER BY created_at DESC, id DESC");
    let mut bookings = sqlx::query_as::<_, Booking>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    let details = sqlx::query_as::<_, BookingDetail>(
        "SELECT d.id, d.booking_id, d.schedule_id, d.pax, d.created_at FROM booking_detail d \
         JOIN booking b ON b.id = d.booking_id WHERE b.user_id = ? ORDER BY d.created_at, d.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<i64, Vec<BookingDetail>> = HashMap::new();
    for detail in details {
        grouped.entry(detail.booking_id).or_default().push(detail);
    }
    for booking in &mut bookings {
        booking.details = grouped.remove(&booking.id).unwrap_or_default();
    }
    Ok(bookings)
}

/// Move a booking from `PENDING` to `COMPLETE`.
pub async fn complete(pool: &SqlitePool, id: i64) -> RepoResult<Booking> {
    let result = sqlx::query("UPDATE booking SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4")
        .bind(BookingStatus::Complete)
        .bind(shared::util::now_millis())
        .bind(id)
        .bind(BookingStatus::Pending)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        let status: Option<BookingStatus> = sqlx::query_scalar("SELECT status FROM booking WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        return Err(match status {
            None => RepoError::NotFound(Entity::Booking, id.to_string()),
            Some(status) => RepoError::InvalidState(
                Entity::Booking,
                format!("only PENDING bookings can be completed, booking {id} is {status:?}"),
            ),
        });
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Booking, id.to_string()))
}

/// Expire every `PENDING` booking holding seats in a slot that started
/// before `now` (local `YYYY-MM-DD HH:MM`). Seats are not given back.
pub async fn expire_overdue(pool: &SqlitePool, now: &str) -> RepoResult<Vec<Booking>> {
    let sql = format!(
        "UPDATE booking SET status = ?1, updated_at = ?2 \
         WHERE status = ?3 AND id IN ( \
             SELECT d.booking_id FROM booking_detail d JOIN schedule s ON s.id = d.schedule_id \
             WHERE s.date || ' ' || s.start_time < ?4) \
         RETURNING {COLUMNS}"
    );
    let expired = sqlx::query_as::<_, Booking>(&sql)
        .bind(BookingStatus::Expired)
        .bind(shared::util::now_millis())
        .bind(BookingStatus::Pending)
        .bind(now)
        .fetch_all(pool)
        .await?;
    Ok(expired)
}
