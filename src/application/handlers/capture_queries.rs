//! Read-only queries over the capture store, for the dashboard API.
//!
//! Queries never mutate records and never refresh their expiry.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::capture::CaptureRecord;
use crate::domain::foundation::Timestamp;
use crate::ports::{CaptureStore, StoreError};

/// Aggregate numbers over the in-flight captures.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureStats {
    pub total: usize,
    pub by_state: HashMap<String, usize>,
    pub last_activity: Option<Timestamp>,
}

/// Query service over the store.
pub struct CaptureQueries {
    store: Arc<dyn CaptureStore>,
}

impl CaptureQueries {
    pub fn new(store: Arc<dyn CaptureStore>) -> Self {
        Self { store }
    }

    /// Every in-flight capture.
    pub async fn list(&self) -> Result<Vec<CaptureRecord>, StoreError> {
        self.store.all().await
    }

    /// Totals and per-state counts.
    pub async fn stats(&self) -> Result<CaptureStats, StoreError> {
        let records = self.store.all().await?;

        let mut by_state: HashMap<String, usize> = HashMap::new();
        let mut last_activity: Option<Timestamp> = None;

        for record in &records {
            *by_state.entry(record.state().to_string()).or_insert(0) += 1;
            if last_activity.map_or(true, |t| record.updated_at().is_after(&t)) {
                last_activity = Some(record.updated_at());
            }
        }

        Ok(CaptureStats {
            total: records.len(),
            by_state,
            last_activity,
        })
    }
}
