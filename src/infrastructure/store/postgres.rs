//! PostgreSQL store implementations
//!
//! Runtime-bound queries over a shared connection pool; no compile-time
//! database dependency.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use uuid::Uuid;

use crate::domain::{AttemptLog, DomainError, ProviderRecord};

use super::{AttemptLogStore, ProviderStore, SettingsStore};

/// Open a connection pool for the store implementations.
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
}

/// PostgreSQL implementation of ProviderStore
#[derive(Debug, Clone)]
pub struct PostgresProviderStore {
    pool: PgPool,
}

impl PostgresProviderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS providers (
                id UUID PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                provider_id VARCHAR(255) NOT NULL,
                base_url TEXT NOT NULL,
                model VARCHAR(255) NOT NULL,
                api_key_encrypted TEXT,
                priority INTEGER NOT NULL DEFAULT 10,
                enabled BOOLEAN NOT NULL DEFAULT TRUE,
                max_tokens INTEGER NOT NULL DEFAULT 1000,
                temperature REAL NOT NULL DEFAULT 0.1,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create providers table: {}", e)))?;

        Ok(())
    }
}

fn row_to_record(row: &PgRow) -> ProviderRecord {
    let priority: i32 = row.get("priority");
    let max_tokens: i32 = row.get("max_tokens");
    let created_at: DateTime<Utc> = row.get("created_at");

    ProviderRecord {
        id: row.get("id"),
        name: row.get("name"),
        provider_id: row.get("provider_id"),
        base_url: row.get("base_url"),
        model: row.get("model"),
        api_key_encrypted: row.get("api_key_encrypted"),
        priority,
        enabled: row.get("enabled"),
        max_tokens: max_tokens.max(0) as u32,
        temperature: row.get("temperature"),
        created_at,
    }
}

#[async_trait]
impl ProviderStore for PostgresProviderStore {
    async fn list_enabled(&self) -> Result<Vec<ProviderRecord>, DomainError> {
        let rows = sqlx::query(
            "SELECT * FROM providers WHERE enabled = TRUE ORDER BY priority ASC, created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list providers: {}", e)))?;

        Ok(rows.iter().map(row_to_record).collect())
    }

    async fn list(&self) -> Result<Vec<ProviderRecord>, DomainError> {
        let rows = sqlx::query("SELECT * FROM providers ORDER BY priority ASC, created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list providers: {}", e)))?;

        Ok(rows.iter().map(row_to_record).collect())
    }

    async fn insert(&self, record: ProviderRecord) -> Result<ProviderRecord, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO providers
                (id, name, provider_id, base_url, model, api_key_encrypted,
                 priority, enabled, max_tokens, temperature, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.provider_id)
        .bind(&record.base_url)
        .bind(&record.model)
        .bind(&record.api_key_encrypted)
        .bind(record.priority)
        .bind(record.enabled)
        .bind(record.max_tokens as i32)
        .bind(record.temperature)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to insert provider: {}", e)))?;

        Ok(record)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM providers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete provider: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_model(&self, id: &Uuid, model: &str) -> Result<ProviderRecord, DomainError> {
        let row = sqlx::query("UPDATE providers SET model = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(model)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update provider: {}", e)))?
            .ok_or_else(|| DomainError::storage(format!("Provider record '{}' not found", id)))?;

        Ok(row_to_record(&row))
    }
}

/// PostgreSQL implementation of SettingsStore
#[derive(Debug, Clone)]
pub struct PostgresSettingsStore {
    pool: PgPool,
}

impl PostgresSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key VARCHAR(255) PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create settings table: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl SettingsStore for PostgresSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read setting: {}", e)))?;

        Ok(row.map(|r| r.get("value")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to write setting: {}", e)))?;

        Ok(())
    }
}

/// PostgreSQL implementation of AttemptLogStore
#[derive(Debug, Clone)]
pub struct PostgresAttemptLogStore {
    pool: PgPool,
}

impl PostgresAttemptLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS provider_attempts (
                id BIGSERIAL PRIMARY KEY,
                provider_id VARCHAR(255) NOT NULL,
                success BOOLEAN NOT NULL,
                error_message TEXT,
                response_time_ms BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::storage(format!("Failed to create provider_attempts table: {}", e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl AttemptLogStore for PostgresAttemptLogStore {
    async fn append(&self, entry: AttemptLog) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO provider_attempts (provider_id, success, error_message, response_time_ms)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&entry.provider_id)
        .bind(entry.success)
        .bind(&entry.error_message)
        .bind(entry.response_time_ms as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to append attempt log: {}", e)))?;

        Ok(())
    }
}
