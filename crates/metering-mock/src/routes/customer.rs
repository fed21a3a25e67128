// SPDX-License-Identifier: BUSL-1.1
//! # ResolveCustomer
//!
//! Routes:
//! - POST /ResolveCustomer/: exchange a registration token for the canned
//!   customer identifier and product code

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::response::Response;
use axum::routing::post;
use axum::Router;

use crate::error::AppError;
use crate::extractors::{extract_json, json_ok};
use crate::routes::route_with_trailing_slash;
use crate::state::AppState;
use crate::types::{ResolveCustomerRequest, ResolveCustomerResponse};

pub fn router() -> Router<AppState> {
    route_with_trailing_slash(Router::new(), "/ResolveCustomer/", post(resolve_customer))
}

async fn resolve_customer(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let req: ResolveCustomerRequest = extract_json(body)?;

    tracing::debug!(
        registration_token = %req.registration_token,
        "received ResolveCustomer request"
    );

    if !state.config.registration_tokens.contains(&req.registration_token) {
        tracing::debug!("registration token is invalid");
        return Err(AppError::Unauthorized(
            "invalid registration token".to_string(),
        ));
    }

    tracing::debug!("registration token is valid");
    json_ok(&ResolveCustomerResponse {
        customer_identifier: state.config.customer_id.clone(),
        product_code: state.config.product_code.clone(),
    })
}
