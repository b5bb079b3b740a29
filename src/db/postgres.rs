//! PostgreSQL data client.
//!
//! Rows are read with `to_jsonb(t)` and written with `jsonb_populate_record`,
//! so one generic code path serves every table. Table and column names are
//! only ever interpolated after passing the [`Table::columns`] whitelist.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::client::{check_columns, check_query, DataClient, DataError, Row, SelectQuery, Table};

#[derive(Clone)]
pub struct PgDataClient {
    pool: PgPool,
}

impl PgDataClient {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_row(value: Value) -> Result<Row, DataError> {
    match value {
        Value::Object(row) => Ok(row),
        _ => Err(DataError::NotAnObject),
    }
}

/// Name the unique column a violated constraint guards, e.g. `idx_blogs_slug`.
fn duplicate_column(table: Table, constraint: Option<&str>) -> String {
    let unique = table.unique_columns();
    constraint
        .and_then(|name| unique.iter().find(|column| name.contains(**column)))
        .or_else(|| unique.first())
        .map(|column| column.to_string())
        .unwrap_or_else(|| "id".to_string())
}

/// Unique violations become [`DataError::Duplicate`]; anything else stays a database error.
fn write_error(table: Table, err: sqlx::Error) -> DataError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => DataError::Duplicate {
            table,
            column: duplicate_column(table, db.constraint()),
        },
        _ => DataError::Database(err),
    }
}

fn select_sql(table: Table, query: &SelectQuery) -> String {
    let mut sql = format!(
        "SELECT to_jsonb(t) FROM {} t WHERE to_jsonb(t) @> $1",
        table.name()
    );
    if let Some(order) = &query.order {
        sql.push_str(&format!(
            " ORDER BY t.{} {}",
            order.column,
            if order.ascending { "ASC" } else { "DESC" }
        ));
    }
    sql.push_str(" LIMIT $2");
    sql
}

fn update_assignments(table: Table, patch: &Row) -> Vec<String> {
    let mut assignments: Vec<String> = patch
        .keys()
        .filter(|column| column.as_str() != "id")
        .map(|column| format!("{column} = p.{column}"))
        .collect();
    if table.tracks_updates() && !patch.contains_key("updated_at") {
        assignments.push("updated_at = now()".to_string());
    }
    assignments
}

#[async_trait]
impl DataClient for PgDataClient {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), DataError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn select(&self, table: Table, query: SelectQuery) -> Result<Vec<Row>, DataError> {
        check_query(table, &query)?;
        let sql = select_sql(table, &query);

        let rows: Vec<Value> = sqlx::query_scalar(&sql)
            .bind(Value::Object(query.filters))
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(into_row).collect()
    }

    async fn insert(&self, table: Table, record: Row) -> Result<Row, DataError> {
        check_columns(table, record.keys())?;
        let sql = format!(
            "INSERT INTO {0} SELECT * FROM jsonb_populate_record(NULL::{0}, $1) RETURNING to_jsonb({0})",
            table.name()
        );

        let row: Value = sqlx::query_scalar(&sql)
            .bind(Value::Object(record))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(table, e))?;

        into_row(row)
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row, DataError> {
        check_columns(table, patch.keys())?;
        let assignments = update_assignments(table, &patch);

        if assignments.is_empty() {
            let rows = self
                .select(table, SelectQuery::all().eq("id", id.to_string()))
                .await?;
            return rows
                .into_iter()
                .next()
                .ok_or(DataError::NotFound { table, id });
        }

        let sql = format!(
            "UPDATE {0} AS t SET {1} FROM jsonb_populate_record(NULL::{0}, $2) AS p \
             WHERE t.id = $1 RETURNING to_jsonb(t)",
            table.name(),
            assignments.join(", ")
        );

        let row: Option<Value> = sqlx::query_scalar(&sql)
            .bind(id)
            .bind(Value::Object(patch))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(table, e))?;

        match row {
            Some(row) => into_row(row),
            None => Err(DataError::NotFound { table, id }),
        }
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<(), DataError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table.name());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DataError::NotFound { table, id });
        }
        Ok(())
    }
}
