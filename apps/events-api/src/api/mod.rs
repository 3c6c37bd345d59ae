//! API routes module
//!
//! Domain routes are served at the root; `create_router` adds docs and middleware.

pub mod events;
pub mod health;

use axum::Router;

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    Router::new()
        .merge(events::router(state))
        .merge(health::router(state.clone()))
}
