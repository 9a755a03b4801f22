//! Optimistic concurrency guard
//!
//! Every versioned write is a single compare-and-swap statement:
//!
//! ```sql
//! UPDATE <table> SET ..., version = :new WHERE id = :id AND version = :submitted
//! ```
//!
//! Zero affected rows means either the row is gone or someone else wrote
//! first. [`ConcurrentUpdateGuard::finish`] tells the two apart.

use shared::VersionToken;
use sqlx::SqliteExecutor;
use sqlx::sqlite::SqliteQueryResult;

use super::repository::{Entity, RepoError, RepoResult};

/// Compare-and-swap guard for one versioned table
#[derive(Debug, Clone, Copy)]
pub struct ConcurrentUpdateGuard {
    table: &'static str,
    entity: Entity,
}

impl ConcurrentUpdateGuard {
    pub const fn new(table: &'static str, entity: Entity) -> Self {
        Self { table, entity }
    }

    /// Reject early when the token read alongside the row is already stale.
    pub fn check(&self, id: i64, stored: &VersionToken, submitted: &VersionToken) -> RepoResult<()> {
        if stored.as_bytes() == submitted.as_bytes() {
            Ok(())
        } else {
            tracing::debug!(entity = %self.entity, id, "Rejected stale version token");
            Err(RepoError::Conflict(self.entity, id))
        }
    }

    /// Resolve the outcome of a guarded UPDATE.
    pub async fn finish<'e, E>(&self, executor: E, id: i64, result: &SqliteQueryResult) -> RepoResult<()>
    where
        E: SqliteExecutor<'e>,
    {
        if result.rows_affected() > 0 {
            return Ok(());
        }
        let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?", self.table);
        let exists: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(executor).await?;
        if exists == 0 {
            Err(RepoError::NotFound(self.entity, id.to_string()))
        } else {
            tracing::debug!(entity = %self.entity, id, "Rejected stale version token");
            Err(RepoError::Conflict(self.entity, id))
        }
    }
}
