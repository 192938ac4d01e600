//! API routes module

pub mod docs;
pub mod health;
pub mod items;

use axum::Router;

use crate::state::AppState;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/items", items::router(state))
        .merge(health::router(state.clone()))
        .merge(docs::router())
}
