pub mod health;

use std::path::Path;

use axum::{
    handler::HandlerWithoutStateExt,
    http::{header, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, get_service, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::access::handlers::handle_verify;
use crate::analysis::handlers::handle_analyze;
use crate::errors::AppError;
use crate::state::AppState;

/// Document served for `/` and `/index.html`.
pub const DEFAULT_DOCUMENT: &str = "index-pearson.html";

async fn not_found() -> AppError {
    AppError::NotFound
}

/// `ServeFile` answers a missing file with an empty 404.
async fn json_not_found(response: Response) -> Response {
    if response.status() == StatusCode::NOT_FOUND {
        AppError::NotFound.into_response()
    } else {
        response
    }
}

fn default_document(index: &Path) -> MethodRouter<AppState> {
    get_service(ServeFile::new(index))
        .fallback(not_found)
        .layer(middleware::map_response(json_not_found))
}

/// Every response gets `Access-Control-Allow-Origin: *`. Any OPTIONS request is
/// answered here with the fixed allow lists and never reaches a handler.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: AppState) -> Router {
    let index = state.config.static_dir.join(DEFAULT_DOCUMENT);
    let assets = ServeDir::new(&state.config.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    Router::new()
        .route("/health", get(health::health_handler).fallback(not_found))
        .route("/", default_document(&index))
        .route("/index.html", default_document(&index))
        .route("/api/verify", post(handle_verify).fallback(not_found))
        .route("/api/analyze", post(handle_analyze).fallback(not_found))
        .fallback_service(assets)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}
