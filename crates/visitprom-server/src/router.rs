//! Axum router wiring.
//!
//! `/metrics` and `/healthz` are operational; `/visit` and every other path
//! count a visit, for any method.

use axum::{
    routing::{any, get},
    Router,
};

use crate::{app_state::AppState, ops, visit};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(ops::metrics))
        .route("/healthz", get(ops::healthz))
        .route("/visit", any(visit::visit))
        .fallback(visit::visit)
        .with_state(state)
}
