use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// HTTP endpoint paths.
pub mod endpoints {
    pub const HEALTH: &str = "/health";
    pub const UPLOAD: &str = "/upload";
    pub const MODELS: &str = "/models";
    pub const MODEL: &str = "/models/:filename";
    pub const ASSET: &str = "/uploads/:filename";
}

/// Any origin may read and write. Suitable for development only.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PUT, Method::POST, Method::DELETE])
        .allow_headers(Any)
        .expose_headers([header::ETAG])
}

/// Build the axum router with all catalog endpoints.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::UPLOAD, post(handler::upload_handler))
        .route(endpoints::MODELS, get(handler::list_models_handler))
        .route(endpoints::MODEL, put(handler::update_model_handler))
        .route(endpoints::ASSET, get(handler::asset_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
