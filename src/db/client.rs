//! Table-level data client.
//!
//! Rows travel as JSON objects keyed by column name. The typed layer in
//! [`crate::db::repo`] converts them to and from the models.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Blogs,
    ContactMessages,
    Profiles,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Blogs => "blogs",
            Table::ContactMessages => "contact_messages",
            Table::Profiles => "profiles",
        }
    }

    /// Column whitelist. Anything used as an identifier in SQL must be in here.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Blogs => &[
                "id",
                "title",
                "slug",
                "content",
                "excerpt",
                "featured_image",
                "status",
                "seo_title",
                "seo_description",
                "keywords",
                "tags",
                "read_time",
                "author_id",
                "publish_date",
                "created_at",
                "updated_at",
            ],
            Table::ContactMessages => &[
                "id",
                "name",
                "email",
                "service",
                "message",
                "status",
                "created_at",
            ],
            Table::Profiles => &["id", "name", "email", "role", "password_hash", "created_at"],
        }
    }

    /// Columns carrying a unique index besides the primary key.
    pub fn unique_columns(&self) -> &'static [&'static str] {
        match self {
            Table::Blogs => &["slug"],
            Table::ContactMessages => &[],
            Table::Profiles => &["email"],
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns().contains(&column)
    }

    /// Whether updates should refresh an `updated_at` column.
    pub fn tracks_updates(&self) -> bool {
        self.has_column("updated_at")
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

/// Equality filters, optional ordering and an optional row limit.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    pub filters: Row,
    pub order: Option<Order>,
    pub limit: Option<i64>,
}

impl SelectQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.insert(column.to_string(), value.into());
        self
    }

    pub fn order_by(mut self, column: &'static str, ascending: bool) -> Self {
        self.order = Some(Order { column, ascending });
        self
    }

    pub fn newest_first(self) -> Self {
        self.order_by("created_at", false)
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("No row in {table} with id {id}")]
    NotFound { table: Table, id: Uuid },

    #[error("Duplicate {column} on {table}")]
    Duplicate { table: Table, column: String },

    #[error("Unknown column {column} on {table}")]
    UnknownColumn { table: Table, column: String },

    #[error("Row is not a JSON object")]
    NotAnObject,

    #[error("Malformed row: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait DataClient: Send + Sync {
    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), DataError>;

    async fn select(&self, table: Table, query: SelectQuery) -> Result<Vec<Row>, DataError>;

    /// Insert a complete record and return the stored row.
    async fn insert(&self, table: Table, record: Row) -> Result<Row, DataError>;

    /// Apply `patch` to the row with `id` and return the updated row.
    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Row, DataError>;

    async fn delete(&self, table: Table, id: Uuid) -> Result<(), DataError>;
}

/// Reject filters, patches or orderings naming columns the table lacks.
pub(crate) fn check_columns<'a>(
    table: Table,
    columns: impl IntoIterator<Item = &'a String>,
) -> Result<(), DataError> {
    for column in columns {
        if !table.has_column(column) {
            return Err(DataError::UnknownColumn {
                table,
                column: column.clone(),
            });
        }
    }
    Ok(())
}

pub(crate) fn check_query(table: Table, query: &SelectQuery) -> Result<(), DataError> {
    check_columns(table, query.filters.keys())?;
    if let Some(order) = &query.order {
        if !table.has_column(order.column) {
            return Err(DataError::UnknownColumn {
                table,
                column: order.column.to_string(),
            });
        }
    }
    Ok(())
}
