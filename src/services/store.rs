use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when reading or writing records
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid record in {table}: {reason}")]
    InvalidRecord { table: Table, reason: String },
}

/// Logical tables of the key-value store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Table {
    Users,
    Households,
    Posts,
    Comments,
    ShoppingLists,
    Bills,
    Notices,
    Reservations,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Users => "UserDetails",
            Table::Households => "Households",
            Table::Posts => "SocialFeedPosts",
            Table::Comments => "SocialFeedComments",
            Table::ShoppingLists => "ShoppingLists",
            Table::Bills => "Bills",
            Table::Notices => "HouseholdNotices",
            Table::Reservations => "ReservedSpaces",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary key of a record: partition key plus optional sort key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordKey {
    pub partition: String,
    pub sort: Option<String>,
}

impl RecordKey {
    pub fn new(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: None,
        }
    }

    pub fn with_sort(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: Some(sort.into()),
        }
    }

    /// Sort key as stored, empty for single-key tables
    pub fn sort_or_empty(&self) -> &str {
        self.sort.as_deref().unwrap_or("")
    }
}

/// Raw key-value storage backend
///
/// Items are JSON objects. Implementations only need to provide
/// single-item operations plus partition queries and full scans.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, table: Table, key: &RecordKey) -> Result<Option<Value>, StoreError>;

    async fn put(&self, table: Table, key: &RecordKey, item: Value) -> Result<(), StoreError>;

    /// Delete an item, returning it if it existed
    async fn delete(&self, table: Table, key: &RecordKey) -> Result<Option<Value>, StoreError>;

    /// All items sharing a partition key, ordered by sort key
    async fn query(&self, table: Table, partition: &str) -> Result<Vec<Value>, StoreError>;

    /// Every item in a table
    async fn scan(&self, table: Table) -> Result<Vec<Value>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;

    fn backend_name(&self) -> &'static str;
}

/// Typed access to a [`RecordStore`]
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn RecordStore>,
}

impl Records {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        table: Table,
        key: &RecordKey,
    ) -> Result<Option<T>, StoreError> {
        match self.store.get(table, key).await? {
            Some(item) => Ok(Some(decode(table, item)?)),
            None => Ok(None),
        }
    }

    pub async fn put<T: Serialize>(
        &self,
        table: Table,
        key: &RecordKey,
        item: &T,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_value(item)?;
        if !value.is_object() {
            return Err(StoreError::InvalidRecord {
                table,
                reason: "item must be a JSON object".to_string(),
            });
        }
        self.store.put(table, key, value).await
    }

    /// Delete an item, returning it decoded as `T`
    ///
    /// The stored item is decoded before it is removed, so a record that is
    /// not a valid `T` is left in place and reported as an error.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        table: Table,
        key: &RecordKey,
    ) -> Result<Option<T>, StoreError> {
        let Some(item) = self.store.get(table, key).await? else {
            return Ok(None);
        };
        let record = decode(table, item)?;

        self.store.delete(table, key).await?;
        Ok(Some(record))
    }

    /// Items under a partition; records that don't decode are skipped
    pub async fn query<T: DeserializeOwned>(
        &self,
        table: Table,
        partition: &str,
    ) -> Result<Vec<T>, StoreError> {
        let items = self.store.query(table, partition).await?;
        Ok(decode_all(table, items))
    }

    /// Every item in a table; records that don't decode are skipped
    pub async fn scan<T: DeserializeOwned>(&self, table: Table) -> Result<Vec<T>, StoreError> {
        let items = self.store.scan(table).await?;
        Ok(decode_all(table, items))
    }

    pub async fn health_check(&self) -> Result<bool, StoreError> {
        self.store.health_check().await
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}

fn decode<T: DeserializeOwned>(table: Table, item: Value) -> Result<T, StoreError> {
    serde_json::from_value(item).map_err(|e| StoreError::InvalidRecord {
        table,
        reason: e.to_string(),
    })
}

fn decode_all<T: DeserializeOwned>(table: Table, items: Vec<Value>) -> Vec<T> {
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping undecodable record in {}: {}", table, e);
                None
            }
        })
        .collect();

    tracing::debug!("Decoded {} of {} records from {}", decoded.len(), total, table);
    decoded
}
