// SPDX-License-Identifier: BUSL-1.1
//! # Body Extraction
//!
//! Handlers take the raw body as `Result<Bytes, BytesRejection>` and decode
//! it here. The `Content-Type` header is not required, matching the
//! upstream API's clients which often omit it.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AppError;

/// Decode a JSON body, mapping read and decode failures to
/// [`AppError::BadRequest`]. A body of `null` decodes as `T::default()`.
///
/// ```ignore
/// async fn handler(body: Result<Bytes, BytesRejection>) -> Result<..., AppError> {
///     let req: MyRequest = extract_json(body)?;
///     // use req...
/// }
/// ```
pub fn extract_json<T: DeserializeOwned + Default>(
    result: Result<Bytes, BytesRejection>,
) -> Result<T, AppError> {
    let bytes = result.map_err(|err| AppError::BadRequest(err.body_text()))?;
    serde_json::from_slice::<Option<T>>(&bytes)
        .map(Option::unwrap_or_default)
        .map_err(|err| AppError::BadRequest(err.to_string()))
}

/// Serialize `value` as a 200 JSON response.
pub fn json_ok<T: Serialize>(value: &T) -> Result<Response, AppError> {
    let body = serde_json::to_vec(value).map_err(|err| AppError::Serialization(err.to_string()))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}
