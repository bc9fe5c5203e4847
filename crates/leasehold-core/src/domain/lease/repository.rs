//! Lock repository for database operations
//!
//! The lock store contract: atomic create-if-absent, conditional update and
//! delete judged by affected-row counts, and bulk delete-by-age. No operation
//! here reads before writing to decide a conflict; uniqueness is enforced by
//! the store's index, and conditional mutations report whether they matched.

use super::types::{CreateOutcome, LockRecord, LockStatus};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Repository for lock record database operations
#[derive(Debug, Clone)]
pub struct LockRepository {
    pool: SqlitePool,
}

impl LockRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a new lock record with status `Owned`
    ///
    /// Relies on the unique index on `name`: under concurrent creation
    /// attempts for the same name, exactly one insert succeeds and every
    /// other caller gets `Conflict`. A unique-constraint violation is
    /// expected contention, not a storage fault; any other database error
    /// propagates.
    pub async fn try_create(
        &self,
        name: &str,
        owner: &str,
        now: DateTime<Utc>,
    ) -> Result<CreateOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO locks (name, owner, last_renewed, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(owner)
        .bind(now)
        .bind(LockStatus::Owned.as_i64())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(CreateOutcome::Created),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(CreateOutcome::Conflict)
            }
            Err(e) => Err(Error::Database(e)),
        }
    }

    /// Get a lock record by name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<LockRecord>> {
        let row: Option<LockRow> = sqlx::query_as(
            r#"
            SELECT id, name, owner, last_renewed, status
            FROM locks
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(row) => Ok(Some(row.into_record()?)),
            None => Ok(None),
        }
    }

    /// Unconditionally update `last_renewed` by row id
    ///
    /// Used only on the caller's own record, after ownership has been
    /// established by `find_by_name`.
    pub async fn touch(&self, id: i64, now: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE locks SET last_renewed = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(())
    }

    /// Set the status of a lock matched by name alone
    ///
    /// Returns the affected-row count; 0 means no record exists for `name`.
    pub async fn set_status(&self, name: &str, status: LockStatus) -> Result<u64> {
        let result = sqlx::query("UPDATE locks SET status = ? WHERE name = ?")
            .bind(status.as_i64())
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }

    /// Delete a lock record matched by both name and owner
    ///
    /// Returns the affected-row count; 0 means the record is absent or the
    /// owner does not match.
    pub async fn delete_by_name_and_owner(&self, name: &str, owner: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM locks WHERE name = ? AND owner = ?")
            .bind(name)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }

    /// Bulk delete every record whose last renewal predates `threshold`,
    /// regardless of owner or status
    pub async fn delete_older_than(&self, threshold: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM locks WHERE last_renewed < ?")
            .bind(threshold)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }

    /// List all live lock records, oldest renewal first
    pub async fn list(&self) -> Result<Vec<LockRecord>> {
        let rows: Vec<LockRow> = sqlx::query_as(
            r#"
            SELECT id, name, owner, last_renewed, status
            FROM locks
            ORDER BY last_renewed ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.into_iter().map(|row| row.into_record()).collect()
    }

    /// Count live lock records
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM locks")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(count)
    }
}

/// Database row for a lock record
#[derive(sqlx::FromRow)]
struct LockRow {
    id: i64,
    name: String,
    owner: String,
    last_renewed: DateTime<Utc>,
    status: i64,
}

impl LockRow {
    fn into_record(self) -> Result<LockRecord> {
        let status = LockStatus::from_i64(self.status)
            .ok_or_else(|| Error::Parse(format!("unknown status value: {}", self.status)))?;

        Ok(LockRecord {
            id: self.id,
            name: self.name,
            owner: self.owner,
            last_renewed: self.last_renewed,
            status,
        })
    }
}
