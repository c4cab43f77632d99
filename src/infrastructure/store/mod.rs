//! External storage interfaces consumed by the core
//!
//! Provider records, flat key-value settings, and the append-only attempt
//! log live behind these traits. In-memory implementations back tests and
//! credential-less dev runs; Postgres backs deployments.

mod memory;
pub mod postgres;

pub use memory::{InMemoryAttemptLogStore, InMemoryProviderStore, InMemorySettingsStore};
pub use postgres::{PostgresAttemptLogStore, PostgresProviderStore, PostgresSettingsStore};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AttemptLog, DomainError, ProviderRecord};

/// Settings key holding the externally configured instruction override.
pub const SYSTEM_PROMPT_KEY: &str = "system_prompt";

/// Provider record store.
#[async_trait]
pub trait ProviderStore: Send + Sync {
    /// Enabled records ordered ascending by priority.
    async fn list_enabled(&self) -> Result<Vec<ProviderRecord>, DomainError>;

    /// All records ordered ascending by priority.
    async fn list(&self) -> Result<Vec<ProviderRecord>, DomainError>;

    async fn insert(&self, record: ProviderRecord) -> Result<ProviderRecord, DomainError>;

    /// Returns true when a record was removed.
    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError>;

    async fn update_model(&self, id: &Uuid, model: &str) -> Result<ProviderRecord, DomainError>;
}

/// Flat key-value settings store.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
}

/// Append-only sink for per-attempt audit records.
#[async_trait]
pub trait AttemptLogStore: Send + Sync {
    async fn append(&self, entry: AttemptLog) -> Result<(), DomainError>;
}
