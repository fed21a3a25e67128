// SPDX-License-Identifier: BUSL-1.1
//! # Route Modules
//!
//! Each module defines an Axum Router for one metering endpoint.
//! Routers are assembled in [`crate::app`].

pub mod customer;
pub mod usage;

use axum::routing::MethodRouter;
use axum::Router;

use crate::state::AppState;

/// Mount `method_router` at `path` and at `path` without its trailing
/// slash, so both spellings reach the same handler.
pub(crate) fn route_with_trailing_slash(
    router: Router<AppState>,
    path: &str,
    method_router: MethodRouter<AppState>,
) -> Router<AppState> {
    let bare = path.trim_end_matches('/');
    if bare.is_empty() || bare == path {
        return router.route(path, method_router);
    }
    router
        .route(path, method_router.clone())
        .route(bare, method_router)
}
