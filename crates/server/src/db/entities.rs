//! Generic owner-scoped entity store.
//!
//! Appointments and tasks share one CRUD lifecycle: create with defaults,
//! list with equality filters under a contractual ordering, partial update,
//! delete. [`OwnedStore`] implements that lifecycle once; the entity kinds
//! describe their schema through [`OwnedRecord`] and its binder traits.
//!
//! Every statement here is filtered by `user_id`. The filtered
//! `UPDATE`/`DELETE` is the sole existence+ownership check - `rows_affected`
//! decides between success and not-found, with no read-then-write window. A
//! record owned by another user therefore produces exactly the same outcome
//! as a nonexistent one.

use std::marker::PhantomData;

use sqlx::query_builder::Separated;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use agenda_core::UserId;

use super::RepositoryError;

/// Refreshes `updated_at` with the same millisecond precision as the schema
/// defaults.
const TOUCH_UPDATED_AT: &str = "updated_at = (strftime('%Y-%m-%d %H:%M:%f', 'now'))";

/// Schema contract for an owner-scoped record kind.
pub trait OwnedRecord: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    /// Validated insert payload. Defaults for omitted optional fields are
    /// already applied by the time a value of this type exists.
    type Insert: InsertValues + Send + Sync;
    /// Field-presence patch: only fields carried here are written.
    type Patch: PatchAssignments + Send + Sync;
    /// Equality predicates accepted by list queries.
    type Filter: FilterPredicates + Send + Sync;

    /// Backing table.
    const TABLE: &'static str;
    /// Columns populated on insert, after `id` and `user_id`.
    const INSERT_COLUMNS: &'static [&'static str];
    /// Contractual list ordering.
    const LIST_ORDER: &'static str;
}

/// Binds insert column values, one per [`OwnedRecord::INSERT_COLUMNS`] entry,
/// in the same order.
pub trait InsertValues {
    fn push_values(&self, values: &mut Separated<'_, '_, Sqlite, &'static str>);
}

/// Binds `column = ?` assignments for the fields present in a patch.
pub trait PatchAssignments {
    /// True if no field is present; such a patch must not touch the row.
    fn is_empty(&self) -> bool;

    fn push_assignments(&self, assignments: &mut Separated<'_, '_, Sqlite, &'static str>);
}

/// Binds `AND column = ?` predicates for the filters present.
pub trait FilterPredicates {
    fn push_predicates(&self, qb: &mut QueryBuilder<'_, Sqlite>);
}

/// Owner-scoped repository over an [`OwnedRecord`] kind.
pub struct OwnedStore<'a, R> {
    pool: &'a SqlitePool,
    _kind: PhantomData<fn() -> R>,
}

impl<'a, R: OwnedRecord> OwnedStore<'a, R> {
    /// Create a store borrowing the shared pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            pool,
            _kind: PhantomData,
        }
    }

    /// Insert a new record for `owner` and return the persisted row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert or readback fails.
    pub async fn create(&self, owner: UserId, insert: &R::Insert) -> Result<R, RepositoryError> {
        let id = Uuid::new_v4();

        let mut qb = QueryBuilder::new("INSERT INTO ");
        qb.push(R::TABLE).push(" (id, user_id");
        for column in R::INSERT_COLUMNS {
            qb.push(", ").push(*column);
        }
        qb.push(") VALUES (");
        let mut values = qb.separated(", ");
        values.push_bind(id.to_string());
        values.push_bind(owner);
        insert.push_values(&mut values);
        qb.push(")");

        qb.build().execute(self.pool).await?;

        // Read back the canonical persisted shape (DB-assigned timestamps)
        self.find_one(id, owner)
            .await?
            .ok_or_else(|| RepositoryError::Database(sqlx::Error::RowNotFound))
    }

    /// List all of `owner`'s records matching `filter`, in
    /// [`OwnedRecord::LIST_ORDER`]. The full result set is returned - no
    /// pagination at this scale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, owner: UserId, filter: &R::Filter) -> Result<Vec<R>, RepositoryError> {
        let mut qb = QueryBuilder::new("SELECT * FROM ");
        qb.push(R::TABLE).push(" WHERE user_id = ").push_bind(owner);
        filter.push_predicates(&mut qb);
        qb.push(" ORDER BY ").push(R::LIST_ORDER);

        Ok(qb.build_query_as::<R>().fetch_all(self.pool).await?)
    }

    /// Fetch one record by `(id, owner)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_one(&self, id: Uuid, owner: UserId) -> Result<Option<R>, RepositoryError> {
        let mut qb = QueryBuilder::new("SELECT * FROM ");
        qb.push(R::TABLE)
            .push(" WHERE id = ")
            .push_bind(id.to_string())
            .push(" AND user_id = ")
            .push_bind(owner);

        Ok(qb.build_query_as::<R>().fetch_optional(self.pool).await?)
    }

    /// Apply a partial update to `(id, owner)` and return the updated row, or
    /// `None` if no such row exists for this owner.
    ///
    /// An empty patch leaves the row - including `updated_at` - untouched.
    /// Otherwise the filtered UPDATE itself performs the atomic
    /// existence+ownership check and `updated_at` is refreshed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn update(
        &self,
        id: Uuid,
        owner: UserId,
        patch: &R::Patch,
    ) -> Result<Option<R>, RepositoryError> {
        if patch.is_empty() {
            return self.find_one(id, owner).await;
        }

        let mut qb = QueryBuilder::new("UPDATE ");
        qb.push(R::TABLE).push(" SET ");
        let mut assignments = qb.separated(", ");
        patch.push_assignments(&mut assignments);
        assignments.push(TOUCH_UPDATED_AT);
        qb.push(" WHERE id = ")
            .push_bind(id.to_string())
            .push(" AND user_id = ")
            .push_bind(owner);

        let result = qb.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_one(id, owner).await
    }

    /// Delete `(id, owner)`.
    ///
    /// # Returns
    ///
    /// `true` if a row was removed, `false` if no matching row existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn delete(&self, id: Uuid, owner: UserId) -> Result<bool, RepositoryError> {
        let mut qb = QueryBuilder::new("DELETE FROM ");
        qb.push(R::TABLE)
            .push(" WHERE id = ")
            .push_bind(id.to_string())
            .push(" AND user_id = ")
            .push_bind(owner);

        let result = qb.build().execute(self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
