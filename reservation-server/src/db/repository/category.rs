//! Category Repository

use super::{Entity, RepoError, RepoResult, on_unique};
use crate::db::dedup::{NameScope, ensure_unique_name};
use crate::db::guard::ConcurrentUpdateGuard;
use shared::VersionToken;
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::util::name_key;
use sqlx::SqlitePool;

const GUARD: ConcurrentUpdateGuard = ConcurrentUpdateGuard::new("category", Entity::Category);

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, version, created_at, updated_at FROM category ORDER BY name_key",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, version, created_at, updated_at FROM category WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let name = data.name.trim();
    ensure_unique_name(pool, NameScope::Category, name, None).await?;

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO category (id, name, name_key, version, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .bind(id)
    .bind(name)
    .bind(name_key(name))
    .bind(VersionToken::generate())
    .bind(now)
    .execute(pool)
    .await
    .map_err(on_unique(Entity::Category, name))?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let name = data.name.as_deref().map(str::trim);
    if let Some(name) = name {
        ensure_unique_name(pool, NameScope::Category, name, Some(id)).await?;
    }

    let result = sqlx::query(
        "UPDATE category SET name = COALESCE(?1, name), name_key = COALESCE(?2, name_key), version = ?3, updated_at = ?4 \
         WHERE id = ?5 AND version = ?6",
    )
    .bind(name)
    .bind(name.map(name_key))
    .bind(VersionToken::generate())
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(&data.version)
    .execute(pool)
    .await
    .map_err(on_unique(Entity::Category, name.unwrap_or_default()))?;
    GUARD.finish(pool, id, &result).await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(Entity::Category, id.to_string()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM restaurant WHERE category_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Err(RepoError::InUse(
            Entity::Category,
            format!("{count} restaurant(s) reference it"),
        ));
    }
    let result = sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(Entity::Category, id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn create_payload(name: &str) -> CategoryCreate {
        CategoryCreate {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_trims_and_rejects_duplicates() {
        let db = DbService::in_memory().await.unwrap();

        let chicken = create(&db.pool, create_payload("  Chicken ")).await.unwrap();
        assert_eq!(chicken.name, "Chicken");

        let err = create(&db.pool, create_payload("chicken")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(Entity::Category, _)));

        create(&db.pool, create_payload("korean")).await.unwrap();
        let err = create(&db.pool, create_payload("Korean ")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(Entity::Category, _)));

        assert_eq!(find_all(&db.pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_rotates_version_and_rejects_stale_token() {
        let db = DbService::in_memory().await.unwrap();
        let original = create(&db.pool, create_payload("Chicken")).await.unwrap();

        let renamed = update(
            &db.pool,
            original.id,
            CategoryUpdate {
                name: Some("Fried Chicken".into()),
                version: original.version.clone(),
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "Fried Chicken");
        assert_ne!(renamed.version, original.version);

        let err = update(
            &db.pool,
            original.id,
            CategoryUpdate {
                name: Some("Wings".into()),
                version: original.version,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Conflict(Entity::Category, _)));

        let current = find_by_id(&db.pool, renamed.id).await.unwrap().unwrap();
        assert_eq!(current.name, "Fried Chicken");
        assert_eq!(current.version, renamed.version);
    }

    #[tokio::test]
    async fn test_rename_to_own_name_in_other_case_is_allowed() {
        let db = DbService::in_memory().await.unwrap();
        let category = create(&db.pool, create_payload("chicken")).await.unwrap();

        let updated = update(
            &db.pool,
            category.id,
            CategoryUpdate {
                name: Some("Chicken".into()),
                version: category.version,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Chicken");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = DbService::in_memory().await.unwrap();
        let err = update(
            &db.pool,
            404,
            CategoryUpdate {
                name: None,
                version: VersionToken::generate(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(Entity::Category, _)));
    }

    #[tokio::test]
    async fn test_delete_refuses_while_referenced() {
        let db = DbService::in_memory().await.unwrap();
        let category = create(&db.pool, create_payload("Chicken")).await.unwrap();
        sqlx::query(
            "INSERT INTO restaurant (id, category_id, name, name_key, version, created_at, updated_at) VALUES (1, ?, 'Bird', 'bird', x'00', 0, 0)",
        )
        .bind(category.id)
        .execute(&db.pool)
        .await
        .unwrap();

        let err = delete(&db.pool, category.id).await.unwrap_err();
        assert!(matches!(err, RepoError::InUse(Entity::Category, _)));

        sqlx::query("DELETE FROM restaurant").execute(&db.pool).await.unwrap();
        delete(&db.pool, category.id).await.unwrap();
        assert!(find_by_id(&db.pool, category.id).await.unwrap().is_none());
        assert!(matches!(
            delete(&db.pool, category.id).await,
            Err(RepoError::NotFound(Entity::Category, _))
        ));
    }
}
