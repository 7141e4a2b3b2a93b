//! Request ID propagation and access logging.
//!
//! Every request runs inside a `request` span carrying its ID. A client or
//! proxy supplied `X-Request-Id` is kept when it looks sane; otherwise a ULID
//! is minted. The ID is returned on the response either way.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::Response;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tower::{Layer, Service};
use tracing::{Instrument, debug, error, info, info_span, warn};

static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest inbound ID accepted as-is.
const MAX_INBOUND_ID_LEN: usize = 128;

#[derive(Clone, Copy, Debug, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Clone, Debug)]
pub struct RequestIdService<S> {
    inner: S,
}

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

impl<S, B> Service<Request> for RequestIdService<S>
where
    S: Service<Request, Response = Response<B>> + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Debug,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let request_id = resolve_request_id(req.headers());
        let span = info_span!("request", req_id = %request_id);
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        let start = Instant::now();

        let response = self.inner.call(req);

        Box::pin(
            async move {
                let mut result = response.await;
                let elapsed = start.elapsed();

                match &mut result {
                    Ok(response) => {
                        log_response(&method, &path, response.status(), elapsed);
                        if let Ok(value) = HeaderValue::from_str(&request_id) {
                            response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
                        }
                    }
                    Err(e) => {
                        error!(%method, path, error = ?e, duration_ms = elapsed.as_millis() as u64, "Request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}

/// The inbound request ID if usable, else a fresh ULID.
fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_INBOUND_ID_LEN)
        .map(str::to_owned)
        .unwrap_or_else(|| ulid::Ulid::new().to_string())
}

/// Successes at debug, client errors at info, server errors at warn.
fn log_response(method: &Method, path: &str, status: StatusCode, elapsed: Duration) {
    let status_code = status.as_u16();
    let duration_ms = elapsed.as_millis() as u64;
    if status.is_server_error() {
        warn!(%method, path, status = status_code, duration_ms, "Response");
    } else if status.is_client_error() {
        info!(%method, path, status = status_code, duration_ms, "Response");
    } else {
        debug!(%method, path, status = status_code, duration_ms, "Response");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_sane_inbound_id() {
        let mut headers = HeaderMap::new();
        headers.insert(&REQUEST_ID_HEADER, HeaderValue::from_static(" edge-42 "));
        assert_eq!(resolve_request_id(&headers), "edge-42");
    }

    #[test]
    fn replaces_blank_or_oversized_id() {
        let mut headers = HeaderMap::new();
        headers.insert(&REQUEST_ID_HEADER, HeaderValue::from_static(""));
        assert_eq!(resolve_request_id(&headers).len(), 26);

        let long = "x".repeat(MAX_INBOUND_ID_LEN + 1);
        headers.insert(&REQUEST_ID_HEADER, HeaderValue::from_str(&long).unwrap());
        let id = resolve_request_id(&headers);
        assert_ne!(id, long);
        assert!(ulid::Ulid::from_string(&id).is_ok());
    }
}
