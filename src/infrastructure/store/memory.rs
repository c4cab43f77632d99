//! In-memory store implementations

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{AttemptLog, DomainError, ProviderRecord};

use super::{AttemptLogStore, ProviderStore, SettingsStore};

/// In-memory implementation of ProviderStore
#[derive(Debug, Default)]
pub struct InMemoryProviderStore {
    records: Arc<RwLock<Vec<ProviderRecord>>>,
}

impl InMemoryProviderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ProviderRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }
}

#[async_trait]
impl ProviderStore for InMemoryProviderStore {
    async fn list_enabled(&self) -> Result<Vec<ProviderRecord>, DomainError> {
        let records = self.records.read().await;
        let mut enabled: Vec<ProviderRecord> =
            records.iter().filter(|r| r.enabled).cloned().collect();
        enabled.sort_by_key(|r| r.priority);
        Ok(enabled)
    }

    async fn list(&self) -> Result<Vec<ProviderRecord>, DomainError> {
        let records = self.records.read().await;
        let mut all: Vec<ProviderRecord> = records.iter().cloned().collect();
        all.sort_by_key(|r| r.priority);
        Ok(all)
    }

    async fn insert(&self, record: ProviderRecord) -> Result<ProviderRecord, DomainError> {
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.id == record.id) {
            return Err(DomainError::storage(format!(
                "Provider record '{}' already exists",
                record.id
            )));
        }

        records.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != *id);
        Ok(records.len() < before)
    }

    async fn update_model(&self, id: &Uuid, model: &str) -> Result<ProviderRecord, DomainError> {
        let mut records = self.records.write().await;

        let record = records
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or_else(|| DomainError::storage(format!("Provider record '{}' not found", id)))?;

        record.model = model.to_string();
        Ok(record.clone())
    }
}

/// In-memory implementation of SettingsStore
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let values = self.values.read().await;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// In-memory implementation of AttemptLogStore
#[derive(Debug, Default)]
pub struct InMemoryAttemptLogStore {
    entries: Arc<RwLock<Vec<AttemptLog>>>,
}

impl InMemoryAttemptLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded entries, in append order.
    pub async fn entries(&self) -> Vec<AttemptLog> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl AttemptLogStore for InMemoryAttemptLogStore {
    async fn append(&self, entry: AttemptLog) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_store_lists_enabled_by_priority() {
        tokio_test::block_on(async {
            let store = InMemoryProviderStore::with_records(vec![
                ProviderRecord::new("slow", "Slow", "https://slow.test", "m").with_priority(20),
                ProviderRecord::new("off", "Off", "https://off.test", "m")
                    .with_priority(1)
                    .with_enabled(false),
                ProviderRecord::new("fast", "Fast", "https://fast.test", "m").with_priority(5),
            ]);

            let enabled = store.list_enabled().await.unwrap();
            let ids: Vec<&str> = enabled.iter().map(|r| r.provider_id.as_str()).collect();
            assert_eq!(ids, vec!["fast", "slow"]);
        });
    }

    #[test]
    fn test_provider_store_insert_delete_update() {
        tokio_test::block_on(async {
            let store = InMemoryProviderStore::new();
            let record = ProviderRecord::new("p1", "P1", "https://p1.test", "old-model");
            let id = record.id;

            store.insert(record.clone()).await.unwrap();
            assert!(store.insert(record).await.is_err());

            let updated = store.update_model(&id, "new-model").await.unwrap();
            assert_eq!(updated.model, "new-model");

            assert!(store.delete(&id).await.unwrap());
            assert!(!store.delete(&id).await.unwrap());
            assert!(store.update_model(&id, "x").await.is_err());
        });
    }

    #[test]
    fn test_settings_store_round_trip() {
        tokio_test::block_on(async {
            let store = InMemorySettingsStore::new();
            assert_eq!(store.get("system_prompt").await.unwrap(), None);

            store.set("system_prompt", "custom").await.unwrap();
            assert_eq!(
                store.get("system_prompt").await.unwrap().as_deref(),
                Some("custom")
            );
        });
    }

    #[test]
    fn test_attempt_log_appends_in_order() {
        tokio_test::block_on(async {
            let store = InMemoryAttemptLogStore::new();
            store.append(AttemptLog::failure("a", "boom", 10)).await.unwrap();
            store.append(AttemptLog::success("b", 20)).await.unwrap();

            let entries = store.entries().await;
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].provider_id, "a");
            assert!(entries[1].success);
        });
    }
}
