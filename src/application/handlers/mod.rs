//! Command and query handlers over the capture core.

mod approve_capture;
mod capture_queries;
mod process_inbound;

pub use approve_capture::{
    ApproveCaptureCommand, ApproveCaptureError, ApproveCaptureHandler, ApproveCaptureResult,
};
pub use capture_queries::{CaptureQueries, CaptureStats};
pub use process_inbound::{
    ProcessInboundCommand, ProcessInboundError, ProcessInboundHandler, ProcessInboundResult,
};
