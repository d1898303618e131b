//! Dashboard HTTP surface.

mod dto;
mod routes;

pub use dto::CaptureSummaryDto;
pub use routes::{api_router, ApiState};
