// SPDX-License-Identifier: BUSL-1.1
//! # BatchMeterUsage
//!
//! Routes:
//! - POST /BatchMeterUsage/: split submitted usage records into processed
//!   results and unprocessed records

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::Router;

use crate::error::AppError;
use crate::extractors::{extract_json, json_ok};
use crate::metering::meter_batch;
use crate::routes::route_with_trailing_slash;
use crate::state::AppState;
use crate::types::BatchMeterUsageRequest;

pub fn router() -> Router<AppState> {
    route_with_trailing_slash(Router::new(), "/BatchMeterUsage/", post(batch_meter_usage))
}

async fn batch_meter_usage(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let req: BatchMeterUsageRequest = extract_json(body)?;

    tracing::debug!(
        product_code = %req.product_code,
        records = req.usage_records.len(),
        "received BatchMeterUsage request"
    );

    let response = meter_batch(state.evaluator.as_ref(), req.usage_records);

    tracing::debug!(
        processed = response.results.len(),
        unprocessed = response.unprocessed_records.len(),
        "metered usage batch"
    );

    json_ok(&response)
}
