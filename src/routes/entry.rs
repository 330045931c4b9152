use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use super::{health, projects, tasks};
use crate::{
    middleware::{catch_panic_layer, cors_layer, json_error_middleware},
    state::AppState,
};

pub const API_PREFIX: &str = "/api";

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(projects::router(state.clone()))
        .merge(tasks::router(state));

    Router::new().nest(API_PREFIX, api)
}

/// The router with the full middleware stack, as served.
pub fn app(state: Arc<AppState>) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.general)?;
    Ok(router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}
