//! In-Memory Capture Store Adapter.
//!
//! The first implementation of the store port: a shared map guarded by an
//! async RwLock. Safe for concurrent lookup/insert across addresses; the
//! application layer serializes read-modify-write per address.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::capture::CaptureRecord;
use crate::domain::foundation::{ChannelAddress, Timestamp};
use crate::ports::{CaptureStore, StoreError};

/// In-memory store of in-flight captures.
#[derive(Clone, Default)]
pub struct InMemoryCaptureStore {
    records: Arc<RwLock<HashMap<ChannelAddress, CaptureRecord>>>,
}

impl InMemoryCaptureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (for tests and stats).
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CaptureStore for InMemoryCaptureStore {
    async fn get(&self, address: &ChannelAddress) -> Result<Option<CaptureRecord>, StoreError> {
        Ok(self.records.read().await.get(address).cloned())
    }

    async fn put(&self, record: CaptureRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(record.channel_address().clone(), record);
        Ok(())
    }

    async fn delete(&self, address: &ChannelAddress) -> Result<(), StoreError> {
        self.records.write().await.remove(address);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<CaptureRecord>, StoreError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn sweep_expired(&self, now: Timestamp) -> Result<usize, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|address, record| {
            let keep = !record.is_expired(now);
            if !keep {
                debug!(channel_address = %address, "expired capture evicted");
            }
            keep
        });
        Ok(before - records.len())
    }
}

/// Runs the expiry sweep on a fixed interval, independent of traffic.
///
/// Spawn once at startup; the task runs for the lifetime of the process.
pub fn spawn_expiry_sweep(store: Arc<dyn CaptureStore>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so startup stays quiet.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match store.sweep_expired(Timestamp::now()).await {
                Ok(0) => {}
                Ok(evicted) => info!(evicted, "expiry sweep removed captures"),
                Err(err) => tracing::warn!(error = %err, "expiry sweep failed"),
            }
        }
    });
}
