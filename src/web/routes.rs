//! Web router construction.

use axum::Router;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

use crate::state::AppState;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::{movies, status};

/// Upper bound on a request, including a synchronous refresh on a stale read.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const NOT_FOUND_PAGE: &str = "<html><head><title>404 Not found</title></head></html>";

/// Creates the web server router
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/movies/", get(movies::list_movies))
        .route("/health", get(status::health))
        .route("/status", get(status::status))
        .fallback(not_found)
        .with_state(app_state)
        .layer((
            // Outermost: per-request ID span + severity-proportional response logging.
            RequestIdLayer,
            TimeoutLayer::new(REQUEST_TIMEOUT),
        ))
}

async fn not_found() -> Response {
    let mut response = (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}
