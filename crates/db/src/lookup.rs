//! Filtered-count lookups for the database-backed validation rules.

use async_trait::async_trait;
use reborn_core::validation::{LookupStore, StoreError};
use sqlx::PgPool;

/// [`LookupStore`] backed by the application's Postgres pool.
///
/// Issues exactly one `COUNT(*)` query per call and maps every sqlx failure
/// to [`StoreError`], keeping "store down" distinguishable from "no match".
pub struct SqlLookupStore {
    pool: PgPool,
}

impl SqlLookupStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LookupStore for SqlLookupStore {
    async fn count_where(
        &self,
        table: &str,
        column: &str,
        value: &str,
        except_id: Option<&str>,
    ) -> Result<i64, StoreError> {
        // Identifiers come from rule specs, which the rules validate before
        // querying; re-check here since they are interpolated, not bound.
        check_identifier(table)?;
        check_identifier(column)?;

        // Form values arrive as text regardless of the column's type
        // (`exists:categories,id` compares text against a bigint), so the
        // comparison is done on the column's text form.
        let count = match except_id {
            None => {
                let sql = format!("SELECT COUNT(*) FROM {table} WHERE {column}::text = $1");
                sqlx::query_scalar::<_, i64>(&sql)
                    .bind(value)
                    .fetch_one(&self.pool)
                    .await
            }
            Some(except_id) => {
                let sql = format!(
                    "SELECT COUNT(*) FROM {table} WHERE {column}::text = $1 AND id::text <> $2"
                );
                sqlx::query_scalar::<_, i64>(&sql)
                    .bind(value)
                    .bind(except_id)
                    .fetch_one(&self.pool)
                    .await
            }
        };

        count.map_err(|err| {
            tracing::error!(error = %err, table, column, "Lookup query failed");
            StoreError::new(err)
        })
    }
}

/// Reject anything that is not a bare SQL identifier.
fn check_identifier(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(StoreError::new(format!("invalid identifier: {name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_check_accepts_plain_names() {
        assert!(check_identifier("users").is_ok());
        assert!(check_identifier("_private2").is_ok());
    }

    #[test]
    fn identifier_check_rejects_sql_fragments() {
        assert!(check_identifier("users; DROP TABLE users").is_err());
        assert!(check_identifier("users\"").is_err());
        assert!(check_identifier("").is_err());
        assert!(check_identifier("1users").is_err());
    }
}
