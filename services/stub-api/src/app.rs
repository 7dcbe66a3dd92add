use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{fallback, healthz, ingest, preflight, readyz, status};

pub fn build_router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/test", get(status).options(preflight))
        .route("/v3/data/", post(ingest).options(preflight))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
