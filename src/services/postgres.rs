use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::services::store::{RecordKey, RecordStore, StoreError, Table};

/// PostgreSQL-backed record store
///
/// Every logical table lives in a single `records` table keyed by
/// `(table_name, partition_key, sort_key)` with the item kept as JSONB.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    async fn get(&self, table: Table, key: &RecordKey) -> Result<Option<Value>, StoreError> {
        let query = r#"
            SELECT item
            FROM records
            WHERE table_name = $1 AND partition_key = $2 AND sort_key = $3
        "#;

        let row = sqlx::query(query)
            .bind(table.as_str())
            .bind(&key.partition)
            .bind(key.sort_or_empty())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get::<Json<Value>, _>("item").0))
    }

    /// Insert or fully replace an item
    async fn put(&self, table: Table, key: &RecordKey, item: Value) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO records (table_name, partition_key, sort_key, item, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (table_name, partition_key, sort_key)
            DO UPDATE SET
                item = EXCLUDED.item,
                updated_at = EXCLUDED.updated_at
        "#;

        sqlx::query(query)
            .bind(table.as_str())
            .bind(&key.partition)
            .bind(key.sort_or_empty())
            .bind(Json(item))
            .execute(&self.pool)
            .await?;

        tracing::debug!("Stored {} record {:?}", table, key);

        Ok(())
    }

    async fn delete(&self, table: Table, key: &RecordKey) -> Result<Option<Value>, StoreError> {
        let query = r#"
            DELETE FROM records
            WHERE table_name = $1 AND partition_key = $2 AND sort_key = $3
            RETURNING item
        "#;

        let row = sqlx::query(query)
            .bind(table.as_str())
            .bind(&key.partition)
            .bind(key.sort_or_empty())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get::<Json<Value>, _>("item").0))
    }

    async fn query(&self, table: Table, partition: &str) -> Result<Vec<Value>, StoreError> {
        let query = r#"
            SELECT item
            FROM records
            WHERE table_name = $1 AND partition_key = $2
            ORDER BY sort_key
        "#;

        let rows = sqlx::query(query)
            .bind(table.as_str())
            .bind(partition)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| row.get::<Json<Value>, _>("item").0)
            .collect())
    }

    async fn scan(&self, table: Table) -> Result<Vec<Value>, StoreError> {
        let query = r#"
            SELECT item
            FROM records
            WHERE table_name = $1
        "#;

        let rows = sqlx::query(query)
            .bind(table.as_str())
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Scanned {} records from {}", rows.len(), table);

        Ok(rows
            .iter()
            .map(|row| row.get::<Json<Value>, _>("item").0)
            .collect())
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
