//! In-memory data client.
//!
//! Backs the tests and the no-database development mode. Rows live in a
//! `tokio::sync::RwLock`ed map and behave like the PostgreSQL client:
//! equality filters, ordering, limits, `updated_at` refresh and `NotFound`
//! on unknown ids.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::client::{check_columns, check_query, DataClient, DataError, Row, SelectQuery, Table};

#[derive(Default)]
pub struct MemoryDataClient {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
}

impl MemoryDataClient {
    pub fn new() -> Self {
        Self::default()
    }
}

fn id_matches(row: &Row, id: Uuid) -> bool {
    row.get("id").and_then(Value::as_str) == Some(id.to_string().as_str())
}

fn matches_filters(row: &Row, filters: &Row) -> bool {
    filters
        .iter()
        .all(|(column, expected)| row.get(column).unwrap_or(&Value::Null) == expected)
}

fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Nulls sort first; timestamps compare as instants rather than as text.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => match (parse_time(x), parse_time(y)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x.cmp(y),
        },
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// First unique column of `record` already held by a row other than `skip`.
fn conflicting_column(table: Table, rows: &[Row], record: &Row, skip: Option<Uuid>) -> Option<String> {
    table
        .unique_columns()
        .iter()
        .find(|column| {
            let value = match record.get(**column) {
                Some(value) if !value.is_null() => value,
                _ => return false,
            };
            rows.iter().any(|row| {
                skip.map_or(true, |id| !id_matches(row, id)) && row.get(**column) == Some(value)
            })
        })
        .map(|column| column.to_string())
}

fn now_value() -> Value {
    serde_json::to_value(Utc::now()).unwrap_or(Value::Null)
}

#[async_trait]
impl DataClient for MemoryDataClient {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), DataError> {
        Ok(())
    }

    async fn select(&self, table: Table, query: SelectQuery) -> Result<Vec<Row>, DataError> {
        check_query(table, &query)?;
        let tables = self.tables.read().await;

        let mut rows: Vec<Row> = tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_filters(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let a = a.get(order.column).unwrap_or(&Value::Null);
                let b = b.get(order.column).unwrap_or(&Value::Null);
                let ordering = compare_values(a, b);
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit.max(0) as usize);
        }

        Ok(rows)
    }

    async fn insert(&self, table: Table, mut record: Row) -> Result<Row, DataError> {
        check_columns(table, record.keys())?;
        // Fill the columns PostgreSQL would leave NULL so both backends agree.
        for column in table.columns() {
            record.entry(column.to_string()).or_insert(Value::Null);
        }

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();
        if let Some(column) = conflicting_column(table, rows, &record, None) {
            return Err(DataError::Duplicate { table, column });
        }
        rows.push(record.clone());
        Ok(record)
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row, DataError> {
        check_columns(table, patch.keys())?;
        let mut tables = self.tables.write().await;

        if let Some(column) = tables
            .get(&table)
            .and_then(|rows| conflicting_column(table, rows, &patch, Some(id)))
        {
            return Err(DataError::Duplicate { table, column });
        }

        let row = tables
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|row| id_matches(row, id)))
            .ok_or(DataError::NotFound { table, id })?;

        let touch = table.tracks_updates() && !patch.contains_key("updated_at");
        for (column, value) in patch {
            if column != "id" {
                row.insert(column, value);
            }
        }
        if touch {
            row.insert("updated_at".to_string(), now_value());
        }

        Ok(row.clone())
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<(), DataError> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();

        let before = rows.len();
        rows.retain(|row| !id_matches(row, id));

        if rows.len() == before {
            return Err(DataError::NotFound { table, id });
        }
        Ok(())
    }
}
