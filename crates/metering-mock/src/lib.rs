// SPDX-License-Identifier: BUSL-1.1
//! # metering-mock: Mock Marketplace Metering API
//!
//! Stands in for the two marketplace metering endpoints a billing
//! integration calls, so that integration can be exercised without the
//! real service. Responses are canned (`ResolveCustomer`) or randomized
//! (`BatchMeterUsage`); nothing is persisted.
//!
//! ## API Surface
//!
//! | Route                    | Module                | Behaviour                          |
//! |--------------------------|-----------------------|------------------------------------|
//! | `POST /ResolveCustomer/` | [`routes::customer`]  | token → canned customer, else 401  |
//! | `POST /BatchMeterUsage/` | [`routes::usage`]     | partition records via evaluator    |
//! | `GET /status`            | this module           | liveness probe                     |
//!
//! Both POST routes also answer without the trailing slash.
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → DefaultBodyLimit → Handler
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod metering;
pub mod routes;
pub mod state;
pub mod types;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::StubConfig;
pub use error::AppError;
pub use state::AppState;

/// Largest accepted request body. Larger bodies fail to buffer and are
/// answered with 400.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status))
        .merge(routes::customer::router())
        .merge(routes::usage::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: always returns 200 if the process is running.
async fn status() -> &'static str {
    "ok"
}
