pub mod disk;
pub mod memory;

use crate::core::domain::Domain;
use crate::core::store::RecordStore;
use crate::core::subscription::Subscription;
use anyhow::{Context, Result};
use disk::FjallRecordStore;
use memory::MemoryRecordStore;
use std::path::Path;
use tracing::debug;

pub const SUBSCRIPTIONS_PARTITION: &str = "subscriptions";
pub const DOMAINS_PARTITION: &str = "domains";

/// The record stores the tracker reads from and writes to.
pub struct RecordStores {
    pub subscriptions: Box<dyn RecordStore<Subscription>>,
    pub domains: Box<dyn RecordStore<Domain>>,
}

impl RecordStores {
    /// Opens (or creates) the on-disk stores under `data_path`.
    pub fn open(data_path: &Path) -> Result<Self> {
        let db_path = data_path.join("records");
        std::fs::create_dir_all(&db_path)
            .with_context(|| format!("Failed to create data directory: {}", db_path.display()))?;
        let keyspace = fjall::Config::new(&db_path)
            .open()
            .with_context(|| format!("Failed to open data store at {}", db_path.display()))?;
        debug!("Opened record store at {}", db_path.display());

        Ok(Self {
            subscriptions: Box::new(FjallRecordStore::new(&keyspace, SUBSCRIPTIONS_PARTITION)?),
            domains: Box::new(FjallRecordStore::new(&keyspace, DOMAINS_PARTITION)?),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            subscriptions: Box::new(MemoryRecordStore::new()),
            domains: Box::new(MemoryRecordStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::core::period::BillingPeriod;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_creates_separate_partitions() {
        let dir = tempdir().unwrap();
        let stores = RecordStores::open(dir.path()).unwrap();

        stores
            .subscriptions
            .create(Subscription::new(
                "Netflix",
                15.49,
                Currency::Usd,
                BillingPeriod::Monthly,
            ))
            .await
            .unwrap();

        assert_eq!(stores.subscriptions.list().await.unwrap().len(), 1);
        assert!(stores.domains.list().await.unwrap().is_empty());
        assert!(dir.path().join("records").exists());
    }
}
