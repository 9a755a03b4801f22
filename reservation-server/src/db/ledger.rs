//! Seat ledger
//!
//! Per-schedule seat counter. A reservation is one conditional UPDATE that
//! only matches while enough seats are left, so two concurrent bookings can
//! never both take the last seats. The booking detail is written on the
//! same connection, inside the caller's transaction.

use shared::VersionToken;
use shared::models::{BookingDetail, ScheduleStatus};
use sqlx::SqliteConnection;

use super::repository::{Entity, RepoError, RepoResult};

pub struct SeatLedger;

impl SeatLedger {
    /// Take `pax` seats from `schedule_id` for `booking_id`.
    ///
    /// Must run inside the transaction that created the booking: on error
    /// nothing has been written by this call, and dropping the transaction
    /// discards the booking as well.
    pub async fn reserve(
        conn: &mut SqliteConnection,
        booking_id: i64,
        schedule_id: i64,
        pax: i32,
    ) -> RepoResult<BookingDetail> {
        if pax < 1 {
            return Err(RepoError::InvalidPax(pax));
        }
        let now = shared::util::now_millis();

        let result = sqlx::query(
            "UPDATE schedule SET available_seats = available_seats - ?1, \
             status = CASE WHEN available_seats - ?1 = 0 THEN 'FULL' ELSE status END, \
             version = ?2, updated_at = ?3 \
             WHERE id = ?4 AND status = 'AVAILABLE' AND available_seats >= ?1",
        )
        .bind(pax)
        .bind(VersionToken::generate())
        .bind(now)
        .bind(schedule_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Self::classify_rejection(conn, schedule_id, pax).await);
        }

        let detail = BookingDetail {
            id: shared::util::snowflake_id(),
            booking_id,
            schedule_id,
            pax,
            created_at: now,
        };
        sqlx::query(
            "INSERT INTO booking_detail (id, booking_id, schedule_id, pax, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(detail.id)
        .bind(detail.booking_id)
        .bind(detail.schedule_id)
        .bind(detail.pax)
        .bind(detail.created_at)
        .execute(&mut *conn)
        .await?;

        tracing::debug!(schedule_id, booking_id, pax, "Seats reserved");
        Ok(detail)
    }

    /// Explain why the conditional decrement matched nothing.
    async fn classify_rejection(conn: &mut SqliteConnection, schedule_id: i64, pax: i32) -> RepoError {
        let row: Result<Option<(i32, ScheduleStatus)>, _> =
            sqlx::query_as("SELECT available_seats, status FROM schedule WHERE id = ?")
                .bind(schedule_id)
                .fetch_optional(&mut *conn)
                .await;
        match row {
            Ok(None) => RepoError::NotFound(Entity::Schedule, schedule_id.to_string()),
            Ok(Some((_, ScheduleStatus::Unavailable))) => RepoError::ScheduleUnavailable(schedule_id),
            Ok(Some((available, _))) => RepoError::InsufficientSeats {
                schedule_id,
                requested: pax,
                available,
            },
            Err(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use sqlx::SqlitePool;

    async fn seed(pool: &SqlitePool, capacity: i32, status: &str) {
        sqlx::query(
            "INSERT INTO restaurant (id, name, name_key, version, created_at, updated_at) VALUES (1, 'Seoul House', 'seoul house', x'00', 0, 0)",
        )
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO schedule (id, restaurant_id, date, start_time, capacity, available_seats, status, version, created_at, updated_at) \
             VALUES (10, 1, '2030-01-01', '18:00', ?1, ?1, ?2, x'00', 0, 0)",
        )
        .bind(capacity)
        .bind(status)
        .execute(pool)
        .await
        .unwrap();
    }

    async fn booking(conn: &mut SqliteConnection, id: i64) {
        sqlx::query(
            "INSERT INTO booking (id, booking_no, user_id, contact_name, contact_email, pax, created_at, updated_at) \
             VALUES (?1, 'BK-' || ?1, 7, 'Kim', 'kim@example.com', 1, 0, 0)",
        )
        .bind(id)
        .execute(conn)
        .await
        .unwrap();
    }

    /// Run a reservation in its own transaction, committing only on success.
    async fn reserve(pool: &SqlitePool, booking_id: i64, pax: i32) -> RepoResult<BookingDetail> {
        let mut tx = pool.begin().await.unwrap();
        booking(&mut tx, booking_id).await;
        let detail = SeatLedger::reserve(&mut tx, booking_id, 10, pax).await?;
        tx.commit().await.unwrap();
        Ok(detail)
    }

    async fn seats(pool: &SqlitePool) -> (i32, String) {
        sqlx::query_as("SELECT available_seats, status FROM schedule WHERE id = 10")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn detail_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM booking_detail")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reserve_decrements_and_rejects_overbooking() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool, 20, "AVAILABLE").await;

        let detail = reserve(&db.pool, 1, 5).await.unwrap();
        assert_eq!(detail.pax, 5);
        assert_eq!(seats(&db.pool).await, (15, "AVAILABLE".to_string()));

        let err = reserve(&db.pool, 2, 20).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::InsufficientSeats {
                schedule_id: 10,
                requested: 20,
                available: 15
            }
        ));
        assert_eq!(seats(&db.pool).await, (15, "AVAILABLE".to_string()));
        assert_eq!(detail_count(&db.pool).await, 1);
    }

    #[tokio::test]
    async fn test_taking_last_seats_marks_full() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool, 4, "AVAILABLE").await;

        reserve(&db.pool, 1, 4).await.unwrap();
        assert_eq!(seats(&db.pool).await, (0, "FULL".to_string()));

        let err = reserve(&db.pool, 2, 1).await.unwrap_err();
        assert!(matches!(err, RepoError::InsufficientSeats { available: 0, .. }));
    }

    #[tokio::test]
    async fn test_retired_schedule_rejects() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool, 10, "UNAVAILABLE").await;

        let err = reserve(&db.pool, 1, 2).await.unwrap_err();
        assert!(matches!(err, RepoError::ScheduleUnavailable(10)));
        assert_eq!(seats(&db.pool).await, (10, "UNAVAILABLE".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_pax_and_missing_schedule() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool, 10, "AVAILABLE").await;

        let err = reserve(&db.pool, 1, 0).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidPax(0)));

        let mut tx = db.pool.begin().await.unwrap();
        let err = SeatLedger::reserve(&mut tx, 1, 999, 1).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(Entity::Schedule, _)));
    }

    #[tokio::test]
    async fn test_reserve_rotates_schedule_version() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool, 10, "AVAILABLE").await;

        reserve(&db.pool, 1, 1).await.unwrap();
        let version: Vec<u8> = sqlx::query_scalar("SELECT version FROM schedule WHERE id = 10")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_ne!(version, vec![0u8]);
    }
}
