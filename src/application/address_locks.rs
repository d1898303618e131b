//! Per-address serialization of capture mutations.
//!
//! Messages for one channel address must be processed strictly in arrival
//! order: no two concurrent handler invocations for the same address may
//! interleave their merge and transition. Different addresses proceed in
//! parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::ChannelAddress;

/// Registry of one async mutex per channel address.
#[derive(Clone, Default)]
pub struct AddressLocks {
    inner: Arc<Mutex<HashMap<ChannelAddress, Arc<Mutex<()>>>>>,
}

impl AddressLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for an address, creating it on first use.
    /// The guard is held across the whole read-modify-write of a record.
    pub async fn acquire(&self, address: &ChannelAddress) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(address.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
