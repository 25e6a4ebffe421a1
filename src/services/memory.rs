use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::services::store::{RecordKey, RecordStore, StoreError, Table};

/// Process-local record store
///
/// Used for tests and local development. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<(Table, String, String), Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(table: Table, key: &RecordKey) -> (Table, String, String) {
        (table, key.partition.clone(), key.sort_or_empty().to_string())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, table: Table, key: &RecordKey) -> Result<Option<Value>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.get(&Self::slot(table, key)).cloned())
    }

    async fn put(&self, table: Table, key: &RecordKey, item: Value) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.insert(Self::slot(table, key), item);
        Ok(())
    }

    async fn delete(&self, table: Table, key: &RecordKey) -> Result<Option<Value>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.remove(&Self::slot(table, key)))
    }

    async fn query(&self, table: Table, partition: &str) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .iter()
            .filter(|((t, pk, _), _)| *t == table && pk == partition)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn scan(&self, table: Table) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .iter()
            .filter(|((t, _, _), _)| *t == table)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
