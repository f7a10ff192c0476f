use crate::core::store::{Record, RecordStore};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use tracing::{debug, warn};

#[derive(Serialize, Deserialize)]
struct StoredRecord<T> {
    seq: u64,
    record: T,
}

/// Record store backed by one fjall partition, JSON encoded.
///
/// Each value carries a sequence number so `list` can return records in the
/// order they were created.
pub struct FjallRecordStore<T: Record> {
    keyspace: Keyspace,
    partition: PartitionHandle,
    _marker: PhantomData<T>,
}

impl<T: Record> FjallRecordStore<T> {
    pub fn new(keyspace: &Keyspace, name: &str) -> Result<Self> {
        let partition = keyspace.open_partition(name, PartitionCreateOptions::default())?;
        Ok(Self {
            keyspace: keyspace.clone(),
            partition,
            _marker: PhantomData,
        })
    }

    fn entries(&self) -> Result<Vec<StoredRecord<T>>> {
        let mut entries = Vec::new();
        for item in self.partition.iter() {
            let (key, value) = item?;
            match serde_json::from_slice::<StoredRecord<T>>(&value) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    "Skipping unreadable record {}: {}",
                    String::from_utf8_lossy(&key),
                    e
                ),
            }
        }
        entries.sort_by_key(|e| e.seq);
        Ok(entries)
    }

    fn read(&self, key: &str) -> Result<Option<StoredRecord<T>>> {
        match self.partition.get(key)? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    fn write(&self, entry: &StoredRecord<T>) -> Result<()> {
        self.partition
            .insert(entry.record.key(), serde_json::to_vec(entry)?)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for FjallRecordStore<T> {
    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.entries()?.into_iter().map(|e| e.record).collect())
    }

    async fn create(&self, record: T) -> Result<T> {
        if self.partition.contains_key(record.key())? {
            return Err(anyhow!("Record already exists: {}", record.key()));
        }
        let seq = self
            .entries()?
            .last()
            .map_or(0, |e| e.seq + 1);
        let entry = StoredRecord { seq, record };
        self.write(&entry)?;
        self.flush()?;
        debug!("Store CREATE for key: {}", entry.record.key());
        Ok(entry.record)
    }

    async fn update(&self, key: &str, patch: &T::Patch) -> Result<T> {
        let mut entry = self
            .read(key)?
            .ok_or_else(|| anyhow!("Record not found: {}", key))?;
        entry.record.apply(patch);

        let new_key = entry.record.key().to_string();
        if new_key != key && self.partition.contains_key(&new_key)? {
            return Err(anyhow!("Record already exists: {}", new_key));
        }

        // A rename drops the old key and writes the new one in a single commit
        let mut batch = self
            .keyspace
            .batch()
            .durability(Some(PersistMode::SyncAll));
        if new_key != key {
            batch.remove(&self.partition, key.as_bytes());
        }
        batch.insert(&self.partition, new_key.as_bytes(), serde_json::to_vec(&entry)?);
        batch.commit()?;
        debug!("Store UPDATE for key: {} -> {}", key, new_key);
        Ok(entry.record)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if !self.partition.contains_key(key)? {
            return Err(anyhow!("Record not found: {}", key));
        }
        self.partition.remove(key)?;
        self.flush()?;
        debug!("Store DELETE for key: {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::core::domain::{Domain, DomainPatch};
    use crate::core::period::BillingPeriod;
    use crate::core::subscription::{Subscription, SubscriptionPatch};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn domain(name: &str) -> Domain {
        Domain::new(
            name,
            "Namecheap",
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            "12.98",
            true,
        )
    }

    #[tokio::test]
    async fn test_fjall_store_create_list() {
        let dir = tempdir().unwrap();
        let keyspace = fjall::Config::new(dir.path()).open().unwrap();
        let store = FjallRecordStore::<Domain>::new(&keyspace, "domains").unwrap();

        // Initially, store is empty
        assert!(store.list().await.unwrap().is_empty());

        let first = store.create(domain("b.com")).await.unwrap();
        let second = store.create(domain("a.com")).await.unwrap();

        let list = store.list().await.unwrap();
        assert_eq!(list, vec![first.clone(), second]);

        assert!(store.create(first).await.is_err());
    }

    #[tokio::test]
    async fn test_fjall_store_update_delete() {
        let dir = tempdir().unwrap();
        let keyspace = fjall::Config::new(dir.path()).open().unwrap();
        let store = FjallRecordStore::<Domain>::new(&keyspace, "domains").unwrap();

        let created = store.create(domain("example.com")).await.unwrap();
        let updated = store
            .update(
                &created.id,
                &DomainPatch {
                    renewal_cost: Some("15".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.renewal_cost, "15");
        assert_eq!(store.list().await.unwrap()[0].renewal_cost, "15");

        store.delete(&created.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.delete(&created.id).await.is_err());
        assert!(
            store
                .update(&created.id, &DomainPatch::default())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_fjall_store_rename_moves_key() {
        let dir = tempdir().unwrap();
        let keyspace = fjall::Config::new(dir.path()).open().unwrap();
        let store = FjallRecordStore::<Subscription>::new(&keyspace, "subscriptions").unwrap();

        store
            .create(Subscription::new("Netflix", 15.49, Currency::Usd, BillingPeriod::Monthly))
            .await
            .unwrap();
        store
            .create(Subscription::new("Spotify", 10.99, Currency::Usd, BillingPeriod::Monthly))
            .await
            .unwrap();

        let rename = SubscriptionPatch {
            name: Some("Netflix Premium".to_string()),
            price: Some(22.99),
            ..Default::default()
        };
        let renamed = store.update("Netflix", &rename).await.unwrap();
        assert_eq!(renamed.name, "Netflix Premium");

        assert!(!store.partition.contains_key("Netflix").unwrap());
        assert!(store.partition.contains_key("Netflix Premium").unwrap());

        // Renamed records keep their place in the list
        let list = store.list().await.unwrap();
        let names: Vec<&str> = list.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Netflix Premium", "Spotify"]);
        assert_eq!(list[0].price, 22.99);

        let clash = SubscriptionPatch {
            name: Some("Spotify".to_string()),
            ..Default::default()
        };
        assert!(store.update("Netflix Premium", &clash).await.is_err());
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fjall_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let created = {
            let keyspace = fjall::Config::new(dir.path()).open().unwrap();
            let store = FjallRecordStore::<Domain>::new(&keyspace, "domains").unwrap();
            store.create(domain("persist.dev")).await.unwrap()
        };

        let keyspace = fjall::Config::new(dir.path()).open().unwrap();
        let store = FjallRecordStore::<Domain>::new(&keyspace, "domains").unwrap();
        assert_eq!(store.list().await.unwrap(), vec![created]);
    }
}
