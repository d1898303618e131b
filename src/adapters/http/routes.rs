//! Axum routes for the dashboard read API and operator actions.
//!
//! - GET  /health                   - liveness check
//! - GET  /api/captures             - all in-flight captures
//! - GET  /api/stats                - totals and per-state counts
//! - POST /api/captures/{address}/approve - operator approval

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::warn;

use crate::application::handlers::{
    ApproveCaptureCommand, ApproveCaptureError, ApproveCaptureHandler, CaptureQueries,
};
use crate::domain::foundation::{ChannelAddress, Timestamp};

use super::dto::{CaptureSummaryDto, DataResponse, ListResponse};

/// Shared state for the API routes.
#[derive(Clone)]
pub struct ApiState {
    pub queries: Arc<CaptureQueries>,
    pub approvals: Arc<ApproveCaptureHandler>,
}

/// Creates the dashboard API router.
pub fn api_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/captures", get(list_captures))
        .route("/api/stats", get(stats))
        .route("/api/captures/:address/approve", post(approve))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "captura",
        "timestamp": Timestamp::now(),
    }))
}

async fn list_captures(State(state): State<ApiState>) -> impl IntoResponse {
    match state.queries.list().await {
        Ok(records) => {
            let data: Vec<CaptureSummaryDto> =
                records.iter().map(CaptureSummaryDto::from).collect();
            let total = data.len();
            Json(ListResponse {
                success: true,
                data,
                total,
            })
            .into_response()
        }
        Err(err) => {
            warn!(error = %err, "listing captures failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn stats(State(state): State<ApiState>) -> impl IntoResponse {
    match state.queries.stats().await {
        Ok(stats) => Json(DataResponse {
            success: true,
            data: stats,
        })
        .into_response(),
        Err(err) => {
            warn!(error = %err, "computing stats failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn approve(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> impl IntoResponse {
    let address = match ChannelAddress::new(address) {
        Ok(address) => address,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match state
        .approvals
        .execute(ApproveCaptureCommand {
            channel_address: address,
        })
        .await
    {
        Ok(result) => Json(json!({
            "success": true,
            "state": result.state.to_string(),
            "outcomes": result.outcomes,
            "confirmation": result.confirmation,
        }))
        .into_response(),
        Err(ApproveCaptureError::NotFound(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            warn!(error = %err, "approval failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "success": false, "error": err.to_string() })),
            )
                .into_response()
        }
    }
}
