use sqlx::{self, postgres::PgRow, FromRow, PgPool};

use crate::database::manager::StoreError;

/// Generic row access for a single table with a bigint surrogate key.
///
/// Absence is an ordinary outcome here: `find_by_id` returns `Ok(None)` for a
/// missing row and callers branch explicitly, it is never folded into
/// `StoreError`.
pub struct Repository<T> {
    table_name: String,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>, pool: PgPool) -> Self {
        Self {
            table_name: table_name.into(),
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<T>, StoreError> {
        let sql = format!("SELECT * FROM \"{}\" WHERE id = $1", self.table_name);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// All rows, newest first
    pub async fn list_latest(&self) -> Result<Vec<T>, StoreError> {
        let sql = format!(
            "SELECT * FROM \"{}\" ORDER BY created_at DESC, id DESC",
            self.table_name
        );
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Delete one row, reporting how many rows went away
    pub async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", self.table_name);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
