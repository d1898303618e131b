//! Capture Store Port - keyed store of in-flight capture records.
//!
//! The interface is a storage abstraction so a durable backing store can
//! be substituted without touching the state machine. Lookup-or-create
//! lives in the application layer; this port only moves records.

use async_trait::async_trait;

use crate::domain::capture::CaptureRecord;
use crate::domain::foundation::{ChannelAddress, Timestamp};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no capture for address: {0}")]
    NotFound(ChannelAddress),

    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Port for persisting in-flight captures, keyed by channel address.
#[async_trait]
pub trait CaptureStore: Send + Sync {
    /// Loads the capture for an address, if one is in flight.
    async fn get(&self, address: &ChannelAddress) -> Result<Option<CaptureRecord>, StoreError>;

    /// Inserts or replaces the capture for its own address.
    async fn put(&self, record: CaptureRecord) -> Result<(), StoreError>;

    /// Removes the capture for an address. Removing an absent address is
    /// not an error.
    async fn delete(&self, address: &ChannelAddress) -> Result<(), StoreError>;

    /// Snapshot of every in-flight capture, for the dashboard API.
    async fn all(&self) -> Result<Vec<CaptureRecord>, StoreError>;

    /// Evicts every record whose expiry has passed; returns how many
    /// were removed. Eviction is the only deletion path in normal flow.
    async fn sweep_expired(&self, now: Timestamp) -> Result<usize, StoreError>;
}
