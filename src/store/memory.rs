use crate::core::store::{Record, RecordStore};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory record store. Contents are lost when the process exits.
pub struct MemoryRecordStore<T: Record> {
    inner: Arc<Mutex<Vec<T>>>,
}

impl<T: Record> MemoryRecordStore<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Record> Default for MemoryRecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryRecordStore<T> {
    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.inner.lock().await.clone())
    }

    async fn create(&self, record: T) -> Result<T> {
        let mut records = self.inner.lock().await;
        if records.iter().any(|r| r.key() == record.key()) {
            return Err(anyhow!("Record already exists: {}", record.key()));
        }
        debug!("Store CREATE for key: {}", record.key());
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, key: &str, patch: &T::Patch) -> Result<T> {
        let mut records = self.inner.lock().await;
        let index = records
            .iter()
            .position(|r| r.key() == key)
            .ok_or_else(|| anyhow!("Record not found: {}", key))?;

        let mut updated = records[index].clone();
        updated.apply(patch);
        if updated.key() != key && records.iter().any(|r| r.key() == updated.key()) {
            return Err(anyhow!("Record already exists: {}", updated.key()));
        }
        debug!("Store UPDATE for key: {}", key);
        records[index] = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut records = self.inner.lock().await;
        let before = records.len();
        records.retain(|r| r.key() != key);
        if records.len() == before {
            return Err(anyhow!("Record not found: {}", key));
        }
        debug!("Store DELETE for key: {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::core::period::BillingPeriod;
    use crate::core::subscription::{Subscription, SubscriptionPatch};

    fn sub(name: &str, price: f64) -> Subscription {
        Subscription::new(name, price, Currency::Usd, BillingPeriod::Monthly)
    }

    #[tokio::test]
    async fn test_create_and_list_in_order() {
        let store = MemoryRecordStore::new();

        // Initially, store is empty
        assert!(store.list().await.unwrap().is_empty());

        store.create(sub("Spotify", 10.99)).await.unwrap();
        store.create(sub("Netflix", 15.49)).await.unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Spotify", "Netflix"]);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_key() {
        let store = MemoryRecordStore::new();
        store.create(sub("Spotify", 10.99)).await.unwrap();
        let result = store.create(sub("Spotify", 5.0)).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Record already exists: Spotify"
        );
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let store = MemoryRecordStore::new();
        store.create(sub("Spotify", 10.99)).await.unwrap();
        store.create(sub("Netflix", 15.49)).await.unwrap();

        let updated = store
            .update(
                "Spotify",
                &SubscriptionPatch {
                    name: Some("Spotify Duo".to_string()),
                    price: Some(14.99),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Spotify Duo");
        assert_eq!(updated.price, 14.99);

        let list = store.list().await.unwrap();
        assert_eq!(list[0].name, "Spotify Duo");

        // Renaming onto an existing key is refused
        let clash = store
            .update(
                "Spotify Duo",
                &SubscriptionPatch {
                    name: Some("Netflix".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(clash.is_err());

        let missing = store.update("Hulu", &SubscriptionPatch::default()).await;
        assert_eq!(missing.unwrap_err().to_string(), "Record not found: Hulu");
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryRecordStore::new();
        store.create(sub("Spotify", 10.99)).await.unwrap();

        store.delete("Spotify").await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.delete("Spotify").await.is_err());
    }
}
