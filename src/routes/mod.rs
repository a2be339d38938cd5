pub mod response;
pub mod todos;

use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::{
    middleware::{catch_panic_layer, json_error_middleware},
    state::AppState,
};

pub use response::{ApiResult, JsonResponse};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().merge(todos::router(state))
}

/// The full service: routes plus error normalization, panic capture and
/// request tracing.
pub fn app(state: Arc<AppState>) -> Router {
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
}
