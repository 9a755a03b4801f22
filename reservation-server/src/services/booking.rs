//! Booking Service
//!
//! Owns the booking transaction and the mails that follow it.

use chrono::Local;
use shared::models::{Booking, BookingCreate};

use crate::db::DbService;
use crate::db::ledger::SeatLedger;
use crate::db::repository::{RepoError, RepoResult, booking, restaurant, schedule};
use crate::mail::{MailQueue, messages};

#[derive(Debug, Clone)]
pub struct BookingService {
    db: DbService,
    mail: MailQueue,
}

impl BookingService {
    pub fn new(db: DbService, mail: MailQueue) -> Self {
        Self { db, mail }
    }

    /// Create a `PENDING` booking and take its seats.
    ///
    /// The booking row, the seat decrement and the booking detail commit
    /// together. Any failure drops the transaction, which rolls back all
    /// three. The confirmation mail is queued only after the commit.
    pub async fn create(&self, data: BookingCreate) -> RepoResult<Booking> {
        // The booking row itself rejects pax < 1, check first for a clear error
        if data.pax < 1 {
            return Err(RepoError::InvalidPax(data.pax));
        }

        let mut tx = self.db.pool.begin().await?;
        let mut created = booking::insert(&mut tx, &data).await?;
        let detail = match SeatLedger::reserve(&mut tx, created.id, data.schedule_id, data.pax).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::info!(
                    schedule_id = data.schedule_id,
                    pax = data.pax,
                    reason = %e,
                    "Booking rejected"
                );
                return Err(e);
            }
        };
        tx.commit().await?;
        created.details.push(detail);

        tracing::info!(
            booking_id = created.id,
            booking_no = %created.booking_no,
            schedule_id = data.schedule_id,
            pax = created.pax,
            "Booking created"
        );

        self.queue_confirmation(&created, data.schedule_id).await;
        Ok(created)
    }

    async fn queue_confirmation(&self, created: &Booking, schedule_id: i64) {
        let pool = &self.db.pool;
        let slot = match schedule::find_by_id(pool, schedule_id).await {
            Ok(Some(slot)) => slot,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(booking_id = created.id, error = %e, "Skipping confirmation mail");
                return;
            }
        };
        let restaurant_name = match restaurant::find_by_id(pool, slot.restaurant_id).await {
            Ok(Some(r)) => r.name,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(booking_id = created.id, error = %e, "Skipping confirmation mail");
                return;
            }
        };
        self.mail
            .enqueue(messages::booking_confirmation(created, &slot, &restaurant_name));
    }

    pub async fn get(&self, id: i64) -> RepoResult<Option<Booking>> {
        booking::find_by_id(&self.db.pool, id).await
    }

    pub async fn get_by_number(&self, booking_no: &str) -> RepoResult<Option<Booking>> {
        booking::find_by_number(&self.db.pool, booking_no).await
    }

    pub async fn list_by_user(&self, user_id: i64) -> RepoResult<Vec<Booking>> {
        booking::find_by_user(&self.db.pool, user_id).await
    }

    /// `PENDING -> COMPLETE`, then queue the thank-you mail.
    pub async fn complete(&self, id: i64) -> RepoResult<Booking> {
        let completed = booking::complete(&self.db.pool, id).await?;
        tracing::info!(booking_id = id, booking_no = %completed.booking_no, "Booking completed");
        self.mail.enqueue(messages::booking_completion(&completed));
        Ok(completed)
    }

    /// Expire pending bookings whose slot has already started.
    pub async fn expire_overdue(&self) -> RepoResult<Vec<Booking>> {
        let now = Local::now().format("%Y-%m-%d %H:%M").to_string();
        let expired = booking::expire_overdue(&self.db.pool, &now).await?;
        if !expired.is_empty() {
            tracing::info!(count = expired.len(), %now, "Expired overdue bookings");
        }
        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::Entity;
    use crate::mail::MailKind;
    use shared::models::BookingStatus;
    use sqlx::SqlitePool;

    async fn seed(pool: &SqlitePool, date: &str, capacity: i32) {
        sqlx::query(
            "INSERT INTO restaurant (id, name, name_key, version, created_at, updated_at) VALUES (1, 'Seoul House', 'seoul house', x'00', 0, 0)",
        )
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO schedule (id, restaurant_id, date, start_time, capacity, available_seats, version, created_at, updated_at) \
             VALUES (10, 1, ?1, '18:00', ?2, ?2, x'00', 0, 0)",
        )
        .bind(date)
        .bind(capacity)
        .execute(pool)
        .await
        .unwrap();
    }

    fn payload(pax: i32) -> BookingCreate {
        BookingCreate {
            user_id: 7,
            schedule_id: 10,
            pax,
            contact_name: "Kim".into(),
            contact_email: "kim@example.com".into(),
        }
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn available(pool: &SqlitePool) -> i32 {
        sqlx::query_scalar("SELECT available_seats FROM schedule WHERE id = 10")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_twenty_seats_scenario() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool, "2099-01-01", 20).await;
        let (mail, mut rx) = MailQueue::channel(8);
        let service = BookingService::new(db.clone(), mail);

        let first = service.create(payload(5)).await.unwrap();
        assert_eq!(first.status, BookingStatus::Pending);
        assert_eq!(first.details.len(), 1);
        assert_eq!(available(&db.pool).await, 15);

        let err = service.create(payload(20)).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::InsufficientSeats {
                requested: 20,
                available: 15,
                ..
            }
        ));
        assert_eq!(available(&db.pool).await, 15);

        // The rejected booking left nothing behind
        assert_eq!(count(&db.pool, "booking").await, 1);
        assert_eq!(count(&db.pool, "booking_detail").await, 1);

        let mail = rx.try_recv().unwrap();
        assert_eq!(mail.kind, MailKind::BookingConfirmation);
        assert_eq!(mail.to, "kim@example.com");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_invalid_pax_and_unknown_schedule() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool, "2099-01-01", 20).await;
        let (mail, _rx) = MailQueue::channel(8);
        let service = BookingService::new(db.clone(), mail);

        assert!(matches!(
            service.create(payload(0)).await,
            Err(RepoError::InvalidPax(0))
        ));

        let mut unknown = payload(2);
        unknown.schedule_id = 999;
        assert!(matches!(
            service.create(unknown).await,
            Err(RepoError::NotFound(Entity::Schedule, _))
        ));
        assert_eq!(count(&db.pool, "booking").await, 0);
    }

    #[tokio::test]
    async fn test_complete_sends_mail_and_expiry_skips_completed() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool, "2020-01-01", 20).await;
        let (mail, mut rx) = MailQueue::channel(8);
        let service = BookingService::new(db.clone(), mail);

        let done = service.create(payload(2)).await.unwrap();
        let overdue = service.create(payload(3)).await.unwrap();
        service.complete(done.id).await.unwrap();

        let kinds: Vec<MailKind> = std::iter::from_fn(|| rx.try_recv().ok()).map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MailKind::BookingConfirmation,
                MailKind::BookingConfirmation,
                MailKind::BookingCompletion
            ]
        );

        let expired = service.expire_overdue().await.unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, overdue.id);
        assert_eq!(available(&db.pool).await, 15);

        let done = service.get(done.id).await.unwrap().unwrap();
        assert_eq!(done.status, BookingStatus::Complete);
    }
}
