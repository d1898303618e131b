//! Capture store adapters.

mod in_memory;

pub use in_memory::{spawn_expiry_sweep, InMemoryCaptureStore};
