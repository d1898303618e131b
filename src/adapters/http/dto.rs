//! Response DTOs for the dashboard read API.

use serde::Serialize;

use crate::domain::capture::CaptureRecord;
use crate::domain::foundation::Timestamp;

/// Wire shape for one in-flight capture.
#[derive(Debug, Serialize)]
pub struct CaptureSummaryDto {
    pub id: String,
    pub channel_address: String,
    pub state: String,
    pub missing_required: Vec<String>,
    pub received_audio: usize,
    pub received_photos: usize,
    pub selected_photos: usize,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub expires_at: Timestamp,
}

impl From<&CaptureRecord> for CaptureSummaryDto {
    fn from(record: &CaptureRecord) -> Self {
        Self {
            id: record.id().to_string(),
            channel_address: record.channel_address().to_string(),
            state: record.state().to_string(),
            missing_required: record
                .missing_required()
                .iter()
                .map(|f| f.name().to_string())
                .collect(),
            received_audio: record.received_audio().len(),
            received_photos: record.received_photos().len(),
            selected_photos: record.processed_photos().len(),
            created_at: record.created_at(),
            updated_at: record.updated_at(),
            expires_at: record.expires_at(),
        }
    }
}

/// Standard list envelope.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: usize,
}

/// Standard single-value envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}
