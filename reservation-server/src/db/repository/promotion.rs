//! Promotion Repository

use super::{Entity, RepoError, RepoResult, on_unique, parse_date};
use crate::db::dedup::{NameScope, ensure_unique_name};
use crate::db::guard::ConcurrentUpdateGuard;
use shared::VersionToken;
use shared::models::{Promotion, PromotionCreate, PromotionUpdate};
use shared::util::name_key;
use sqlx::SqlitePool;

const GUARD: ConcurrentUpdateGuard = ConcurrentUpdateGuard::new("promotion", Entity::Promotion);

const COLUMNS: &str = "id, restaurant_id, name, description, discount_percent, start_date, end_date, version, created_at, updated_at";

/// Validated period: canonical dates, `start <= end`, discount in 1..=100
struct Period {
    start_date: String,
    end_date: String,
    discount_percent: i32,
}

impl Period {
    fn parse(start: &str, end: &str, discount_percent: i32) -> RepoResult<Self> {
        if !(1..=100).contains(&discount_percent) {
            return Err(RepoError::InvalidPeriod(format!(
                "discount_percent must be between 1 and 100, got {discount_percent}"
            )));
        }
        let start_date = parse_date(start, "start_date")?;
        let end_date = parse_date(end, "end_date")?;
        // Canonical YYYY-MM-DD compares correctly as text
        if start_date > end_date {
            return Err(RepoError::InvalidPeriod(format!(
                "start_date {start_date} is after end_date {end_date}"
            )));
        }
        Ok(Self {
            start_date,
            end_date,
            discount_percent,
        })
    }
}

pub async fn find_by_restaurant(pool: &SqlitePool, restaurant_id: i64) -> RepoResult<Vec<Promotion>> {
    let sql = format!("SELECT {COLUMNS} FROM promotion WHERE restaurant_id = ? ORDER BY start_date, name_key");
    let promotions = sqlx::query_as::<_, Promotion>(&sql)
        .bind(restaurant_id)
        .fetch_all(pool)
        .await?;
    Ok(promotions)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Promotion>> {
    let sql = format!("SELECT {COLUMNS} FROM promotion WHERE id = ?");
    let promotion = sqlx::query_as::<_, Promotion>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(promotion)
}

pub async fn create(pool: &SqlitePool, restaurant_id: i64, data: PromotionCreate) -> RepoResult<Promotion> {
    let restaurant: Option<i64> = sqlx::query_scalar("SELECT id FROM restaurant WHERE id = ?")
        .bind(restaurant_id)
        .fetch_optional(pool)
        .await?;
    if restaurant.is_none() {
        return Err(RepoError::NotFound(Entity::Restaurant, restaurant_id.to_string()));
    }

    let period = Period::parse(&data.start_date, &data.end_date, data.discount_percent)?;
    let name = data.name.trim();
    ensure_unique_name(pool, NameScope::Promotion { restaurant_id }, name, None).await?;

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO promotion (id, restaurant_id, name, name_key, description, discount_percent, start_date, end_date, version, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(name)
    .bind(name_key(name))
    .bind(&data.description)
    .bind(period.discount_percent)
    .bind(&period.start_date)
    .bind(&period.end_date)
    .bind(VersionToken::generate())
    .bind(now)
    .execute(pool)
    .await
    .map_err(on_unique(Entity::Promotion, name))?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create promotion".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: PromotionUpdate) -> RepoResult<Promotion> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Promotion, id.to_string()))?;
    GUARD.check(id, &current.version, &data.version)?;

    // The period is validated as a whole, so merge before checking
    let period = Period::parse(
        data.start_date.as_deref().unwrap_or(&current.start_date),
        data.end_date.as_deref().unwrap_or(&current.end_date),
        data.discount_percent.unwrap_or(current.discount_percent),
    )?;
    let name = data.name.as_deref().map(str::trim).unwrap_or(&current.name);
    ensure_unique_name(
        pool,
        NameScope::Promotion {
            restaurant_id: current.restaurant_id,
        },
        name,
        Some(id),
    )
    .await?;

    let result = sqlx::query(
        "UPDATE promotion SET name = ?1, name_key = ?2, description = COALESCE(?3, description), \
         discount_percent = ?4, start_date = ?5, end_date = ?6, version = ?7, updated_at = ?8 \
         WHERE id = ?9 AND version = ?10",
    )
    .bind(name)
    .bind(name_key(name))
    .bind(&data.description)
    .bind(period.discount_percent)
    .bind(&period.start_date)
    .bind(&period.end_date)
    .bind(VersionToken::generate())
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(&data.version)
    .execute(pool)
    .await
    .map_err(on_unique(Entity::Promotion, name))?;
    GUARD.finish(pool, id, &result).await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Promotion, id.to_string()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM promotion WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(Entity::Promotion, id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn restaurant(pool: &SqlitePool, id: i64) {
        sqlx::query(
            "INSERT INTO restaurant (id, name, name_key, version, created_at, updated_at) VALUES (?1, 'R' || ?1, 'r' || ?1, x'00', 0, 0)",
        )
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
    }

    fn payload(name: &str) -> PromotionCreate {
        PromotionCreate {
            name: name.to_string(),
            description: None,
            discount_percent: 15,
            start_date: "2030-03-01".into(),
            end_date: "2030-03-31".into(),
        }
    }

    fn patch(version: VersionToken) -> PromotionUpdate {
        PromotionUpdate {
            name: None,
            description: None,
            discount_percent: None,
            start_date: None,
            end_date: None,
            version,
        }
    }

    #[tokio::test]
    async fn test_concurrent_editors_second_one_conflicts() {
        let db = DbService::in_memory().await.unwrap();
        restaurant(&db.pool, 1).await;
        let promo = create(&db.pool, 1, payload("Spring Deal")).await.unwrap();

        // A and B both read T1
        let t1 = promo.version.clone();

        let mut a = patch(t1.clone());
        a.discount_percent = Some(20);
        let after_a = update(&db.pool, promo.id, a).await.unwrap();
        assert_ne!(after_a.version, t1);

        let mut b = patch(t1);
        b.discount_percent = Some(50);
        let err = update(&db.pool, promo.id, b).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict(Entity::Promotion, _)));

        let stored = find_by_id(&db.pool, promo.id).await.unwrap().unwrap();
        assert_eq!(stored.discount_percent, 20);
    }

    #[tokio::test]
    async fn test_period_validation() {
        let db = DbService::in_memory().await.unwrap();
        restaurant(&db.pool, 1).await;

        let mut bad = payload("Backwards");
        bad.start_date = "2030-04-01".into();
        let err = create(&db.pool, 1, bad).await.unwrap_err();
        assert!(matches!(err, RepoError::InvalidPeriod(_)));

        let mut bad = payload("Too Generous");
        bad.discount_percent = 101;
        assert!(matches!(
            create(&db.pool, 1, bad).await,
            Err(RepoError::InvalidPeriod(_))
        ));

        // Moving only the end date before the stored start is caught on update
        let promo = create(&db.pool, 1, payload("Spring Deal")).await.unwrap();
        let mut change = patch(promo.version);
        change.end_date = Some("2030-02-01".into());
        assert!(matches!(
            update(&db.pool, promo.id, change).await,
            Err(RepoError::InvalidPeriod(_))
        ));
    }

    #[tokio::test]
    async fn test_names_unique_per_restaurant_only() {
        let db = DbService::in_memory().await.unwrap();
        restaurant(&db.pool, 1).await;
        restaurant(&db.pool, 2).await;

        create(&db.pool, 1, payload("Happy Hour")).await.unwrap();
        create(&db.pool, 2, payload("happy hour")).await.unwrap();
        let err = create(&db.pool, 1, payload("HAPPY HOUR ")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(Entity::Promotion, _)));

        assert_eq!(find_by_restaurant(&db.pool, 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_restaurant_and_delete() {
        let db = DbService::in_memory().await.unwrap();
        let err = create(&db.pool, 9, payload("Ghost")).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(Entity::Restaurant, _)));

        restaurant(&db.pool, 1).await;
        let promo = create(&db.pool, 1, payload("Spring Deal")).await.unwrap();
        delete(&db.pool, promo.id).await.unwrap();
        assert!(matches!(
            delete(&db.pool, promo.id).await,
            Err(RepoError::NotFound(Entity::Promotion, _))
        ));
    }
}
