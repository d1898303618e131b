//! Publication adapters: external CRM catalogs.

mod crm;

pub use crm::{CrmDestination, CrmPublisher};
