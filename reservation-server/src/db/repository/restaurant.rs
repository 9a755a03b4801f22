//! Restaurant Repository

use super::{Entity, RepoError, RepoResult, on_unique};
use crate::db::dedup::{NameScope, ensure_unique_name};
use crate::db::guard::ConcurrentUpdateGuard;
use shared::VersionToken;
use shared::models::{Restaurant, RestaurantCreate, RestaurantUpdate};
use shared::util::name_key;
use sqlx::SqlitePool;

const GUARD: ConcurrentUpdateGuard = ConcurrentUpdateGuard::new("restaurant", Entity::Restaurant);

const COLUMNS: &str =
    "id, category_id, name, address, phone, description, is_active, version, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool, category_id: Option<i64>) -> RepoResult<Vec<Restaurant>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM restaurant WHERE (?1 IS NULL OR category_id = ?1) ORDER BY name_key"
    );
    let restaurants = sqlx::query_as::<_, Restaurant>(&sql)
        .bind(category_id)
        .fetch_all(pool)
        .await?;
    Ok(restaurants)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Restaurant>> {
    let sql = format!("SELECT {COLUMNS} FROM restaurant WHERE id = ?");
    let restaurant = sqlx::query_as::<_, Restaurant>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(restaurant)
}

async fn ensure_category(pool: &SqlitePool, category_id: Option<i64>) -> RepoResult<()> {
    let Some(category_id) = category_id else {
        return Ok(());
    };
    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM category WHERE id = ?")
        .bind(category_id)
        .fetch_optional(pool)
        .await?;
    match exists {
        Some(_) => Ok(()),
        None => Err(RepoError::NotFound(Entity::Category, category_id.to_string())),
    }
}

pub async fn create(pool: &SqlitePool, data: RestaurantCreate) -> RepoResult<Restaurant> {
    let name = data.name.trim();
    ensure_unique_name(pool, NameScope::Restaurant, name, None).await?;
    ensure_category(pool, data.category_id).await?;

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO restaurant (id, category_id, name, name_key, address, phone, description, is_active, version, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?9, ?9)",
    )
    .bind(id)
    .bind(data.category_id)
    .bind(name)
    .bind(name_key(name))
    .bind(&data.address)
    .bind(&data.phone)
    .bind(&data.description)
    .bind(VersionToken::generate())
    .bind(now)
    .execute(pool)
    .await
    .map_err(on_unique(Entity::Restaurant, name))?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create restaurant".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: RestaurantUpdate) -> RepoResult<Restaurant> {
    let name = data.name.as_deref().map(str::trim);
    if let Some(name) = name {
        ensure_unique_name(pool, NameScope::Restaurant, name, Some(id)).await?;
    }
    ensure_category(pool, data.category_id).await?;

    let result = sqlx::query(
        "UPDATE restaurant SET name = COALESCE(?1, name), name_key = COALESCE(?2, name_key), \
         category_id = COALESCE(?3, category_id), address = COALESCE(?4, address), phone = COALESCE(?5, phone), \
         description = COALESCE(?6, description), is_active = COALESCE(?7, is_active), \
         version = ?8, updated_at = ?9 \
         WHERE id = ?10 AND version = ?11",
    )
    .bind(name)
    .bind(name.map(name_key))
    .bind(data.category_id)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(&data.description)
    .bind(data.is_active)
    .bind(VersionToken::generate())
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(&data.version)
    .execute(pool)
    .await
    .map_err(on_unique(Entity::Restaurant, name.unwrap_or_default()))?;
    GUARD.finish(pool, id, &result).await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Restaurant, id.to_string()))
}

/// Delete a restaurant and its promotions. Refused while schedules exist.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schedule WHERE restaurant_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Err(RepoError::InUse(
            Entity::Restaurant,
            format!("{count} schedule(s) exist"),
        ));
    }
    let result = sqlx::query("DELETE FROM restaurant WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(Entity::Restaurant, id.to_string()));
    }
    Ok(())
}
