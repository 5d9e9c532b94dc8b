//! HTTP route handlers.

pub mod content;
pub mod health;
pub mod helpers;

use axum::Router;

use crate::state::AppState;

/// Build the application router (without transport middleware).
pub fn app_router(state: AppState) -> Router {
    let mut router = Router::new().merge(health::router());
    for use_case in state.content_use_cases() {
        router = router.merge(content::router(use_case));
    }
    router.with_state(state)
}
