//! Duplicate-name and duplicate-time guards
//!
//! Names compare on `name_key` (trimmed, lowercased), so "Korean " collides
//! with "korean". Schedules collide on the same start minute for the same
//! restaurant and date. The record being edited is excluded by id.
//!
//! These checks give a precise error up front; the unique indexes in the
//! schema still catch two writers that pass the check at the same time.

use shared::util::name_key;
use sqlx::SqlitePool;

use super::repository::{Entity, RepoError, RepoResult};

/// Where a name must be unique
#[derive(Debug, Clone, Copy)]
pub enum NameScope {
    /// Across all categories
    Category,
    /// Across all restaurants
    Restaurant,
    /// Within one restaurant's promotions
    Promotion { restaurant_id: i64 },
}

impl NameScope {
    fn entity(&self) -> Entity {
        match self {
            NameScope::Category => Entity::Category,
            NameScope::Restaurant => Entity::Restaurant,
            NameScope::Promotion { .. } => Entity::Promotion,
        }
    }
}

/// Reject `name` when another record in `scope` already uses it.
pub async fn ensure_unique_name(
    pool: &SqlitePool,
    scope: NameScope,
    name: &str,
    exclude_id: Option<i64>,
) -> RepoResult<()> {
    let key = name_key(name);
    let exclude = exclude_id.unwrap_or(0);

    let taken: Option<i64> = match scope {
        NameScope::Category => {
            sqlx::query_scalar("SELECT id FROM category WHERE name_key = ? AND id != ? LIMIT 1")
                .bind(&key)
                .bind(exclude)
                .fetch_optional(pool)
                .await?
        }
        NameScope::Restaurant => {
            sqlx::query_scalar("SELECT id FROM restaurant WHERE name_key = ? AND id != ? LIMIT 1")
                .bind(&key)
                .bind(exclude)
                .fetch_optional(pool)
                .await?
        }
        NameScope::Promotion { restaurant_id } => {
            sqlx::query_scalar(
                "SELECT id FROM promotion WHERE restaurant_id = ? AND name_key = ? AND id != ? LIMIT 1",
            )
            .bind(restaurant_id)
            .bind(&key)
            .bind(exclude)
            .fetch_optional(pool)
            .await?
        }
    };

    match taken {
        Some(existing) => {
            tracing::debug!(entity = %scope.entity(), existing, name = %name, "Duplicate name rejected");
            Err(RepoError::Duplicate(scope.entity(), name.trim().to_string()))
        }
        None => Ok(()),
    }
}

/// Reject a schedule start time already used by the restaurant on `date`.
///
/// `start_time` must already be normalized to `HH:MM`.
pub async fn ensure_unique_slot(
    pool: &SqlitePool,
    restaurant_id: i64,
    date: &str,
    start_time: &str,
    exclude_id: Option<i64>,
) -> RepoResult<()> {
    let taken: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM schedule WHERE restaurant_id = ? AND date = ? AND start_time = ? AND id != ? LIMIT 1",
    )
    .bind(restaurant_id)
    .bind(date)
    .bind(start_time)
    .bind(exclude_id.unwrap_or(0))
    .fetch_optional(pool)
    .await?;

    match taken {
        Some(_) => Err(RepoError::Duplicate(
            Entity::Schedule,
            format!("{date} {start_time}"),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn seed(pool: &SqlitePool) {
        for (id, name) in [(1, "Chicken"), (2, "Korean")] {
            sqlx::query(
                "INSERT INTO category (id, name, name_key, version, created_at, updated_at) VALUES (?, ?, ?, x'00', 0, 0)",
            )
            .bind(id)
            .bind(name)
            .bind(name_key(name))
            .execute(pool)
            .await
            .unwrap();
        }
        sqlx::query(
            "INSERT INTO restaurant (id, name, name_key, version, created_at, updated_at) VALUES (5, 'Seoul House', 'seoul house', x'00', 0, 0)",
        )
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO schedule (id, restaurant_id, date, start_time, capacity, available_seats, version, created_at, updated_at) \
             VALUES (9, 5, '2030-05-01', '18:30', 10, 10, x'00', 0, 0)",
        )
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_name_check_ignores_case_and_whitespace() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool).await;

        let err = ensure_unique_name(&db.pool, NameScope::Category, "korean ", None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(Entity::Category, ref n) if n == "korean"));

        assert!(
            ensure_unique_name(&db.pool, NameScope::Category, "  CHICKEN", None)
                .await
                .is_err()
        );
        assert!(
            ensure_unique_name(&db.pool, NameScope::Category, "Dim Sum", None)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_name_check_excludes_the_edited_record() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool).await;

        // Renaming "Chicken" to "CHICKEN" is not a clash with itself
        assert!(
            ensure_unique_name(&db.pool, NameScope::Category, "CHICKEN", Some(1))
                .await
                .is_ok()
        );
        assert!(
            ensure_unique_name(&db.pool, NameScope::Category, "chicken", Some(2))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_promotion_names_are_scoped_per_restaurant() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool).await;
        sqlx::query(
            "INSERT INTO promotion (id, restaurant_id, name, name_key, discount_percent, start_date, end_date, version, created_at, updated_at) \
             VALUES (3, 5, 'Happy Hour', 'happy hour', 10, '2030-01-01', '2030-01-31', x'00', 0, 0)",
        )
        .execute(&db.pool)
        .await
        .unwrap();

        let scope = NameScope::Promotion { restaurant_id: 5 };
        assert!(ensure_unique_name(&db.pool, scope, "happy hour", None).await.is_err());

        let other = NameScope::Promotion { restaurant_id: 6 };
        assert!(ensure_unique_name(&db.pool, other, "happy hour", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_slot_check() {
        let db = DbService::in_memory().await.unwrap();
        seed(&db.pool).await;

        let err = ensure_unique_slot(&db.pool, 5, "2030-05-01", "18:30", None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(Entity::Schedule, _)));

        assert!(ensure_unique_slot(&db.pool, 5, "2030-05-01", "18:30", Some(9)).await.is_ok());
        assert!(ensure_unique_slot(&db.pool, 5, "2030-05-02", "18:30", None).await.is_ok());
        assert!(ensure_unique_slot(&db.pool, 5, "2030-05-01", "19:00", None).await.is_ok());
    }
}
