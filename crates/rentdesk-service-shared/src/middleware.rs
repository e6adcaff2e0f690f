//! HTTP middleware: request IDs and request metrics.
//!
//! [`MetricsLayer`] takes the `X-Request-ID` header if present, otherwise it
//! generates a UUID v7 and inserts it into the request so handlers see the
//! same value. The ID is attached to the request span and echoed on the
//! response.
//!
//! Recorded metrics:
//! - `http_requests_total`: counter by method, path and status class
//! - `http_request_duration_seconds`: histogram by method and path

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use http::{HeaderMap, HeaderValue, Request, Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Newtype wrapper for request correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new UUID v7 request ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Extract the request ID from headers or generate a new UUID v7.
///
/// Empty or non-UTF-8 header values are ignored.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Strip the query string so metric labels stay low-cardinality.
pub fn normalize_path(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// What the middleware remembers about a request until its response is ready.
#[derive(Debug)]
struct RequestRecord {
    method: String,
    path: String,
    request_id: RequestId,
    started: Instant,
}

impl RequestRecord {
    fn begin<B>(req: &Request<B>, request_id: RequestId) -> Self {
        Self {
            method: req.method().as_str().to_owned(),
            path: normalize_path(req.uri().path()).to_owned(),
            request_id,
            started: Instant::now(),
        }
    }

    fn span(&self) -> Span {
        info_span!(
            "request",
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
        )
    }

    /// Emit the request counter and latency histogram.
    fn finish(&self, status: &'static str) {
        let elapsed = self.started.elapsed().as_secs_f64();
        let (method, path) = (self.method.clone(), self.path.clone());

        metrics::counter!(
            "http_requests_total",
            "method" => method.clone(),
            "path" => path.clone(),
            "status" => status
        )
        .increment(1);
        metrics::histogram!("http_request_duration_seconds", "method" => method, "path" => path)
            .record(elapsed);

        tracing::info!(status, latency_ms = elapsed * 1000.0, "request completed");
    }
}

/// Tower layer assigning request IDs and recording HTTP metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Tracked<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let request_id = extract_or_generate_request_id(req.headers());
        // Handlers read the ID back from the request headers.
        if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
            req.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        let record = RequestRecord::begin(&req, request_id);
        let span = record.span();
        span.in_scope(|| tracing::debug!("handling request"));

        Tracked {
            inner: self.inner.call(req),
            record,
            span,
        }
    }
}

pin_project! {
    /// Response future that stamps the request ID and records metrics once ready.
    pub struct Tracked<F> {
        #[pin]
        inner: F,
        record: RequestRecord,
        span: Span,
    }
}

impl<F, ResBody, E> Future for Tracked<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _guard = this.span.enter();

        let Poll::Ready(mut result) = this.inner.poll(cx) else {
            return Poll::Pending;
        };

        match &mut result {
            Ok(response) => {
                if let Ok(value) = HeaderValue::from_str(this.record.request_id.as_str()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }
                this.record.finish(status_bucket(response.status().as_u16()));
            }
            Err(_) => {
                tracing::error!("request failed");
                this.record.finish("5xx");
            }
        }

        Poll::Ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use tower::ServiceExt;

    #[test]
    fn test_request_id_generate() {
        let id1 = RequestId::generate();
        let id2 = RequestId::generate();

        assert_ne!(id1, id2);
        assert_eq!(id1.as_str().len(), 36);
    }

    #[test]
    fn test_extract_request_id_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Request-ID", HeaderValue::from_static("test-456"));

        assert_eq!(extract_or_generate_request_id(&headers).as_str(), "test-456");
    }

    #[test]
    fn test_extract_request_id_generates_when_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(""));

        assert_eq!(extract_or_generate_request_id(&headers).as_str().len(), 36);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/api/v1/stores/nearby"), "/api/v1/stores/nearby");
        assert_eq!(normalize_path("/sse?client=1"), "/sse");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_status_bucket() {
        assert_eq!(status_bucket(200), "2xx");
        assert_eq!(status_bucket(301), "3xx");
        assert_eq!(status_bucket(404), "4xx");
        assert_eq!(status_bucket(503), "5xx");
        assert_eq!(status_bucket(99), "other");
    }

    async fn echo_request_id(req: Request<String>) -> Result<Response<String>, Infallible> {
        let seen = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Ok(Response::new(seen))
    }

    #[tokio::test]
    async fn test_layer_generates_and_echoes_request_id() {
        let service = MetricsLayer.layer(tower::service_fn(echo_request_id));
        let response = service
            .oneshot(Request::new(String::new()))
            .await
            .unwrap();

        let header = response.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();
        assert_eq!(header.len(), 36);
        assert_eq!(response.body(), &header);
    }

    #[tokio::test]
    async fn test_layer_preserves_incoming_request_id() {
        let service = MetricsLayer.layer(tower::service_fn(echo_request_id));
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "client-7")
            .body(String::new())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "client-7");
        assert_eq!(response.body(), "client-7");
    }
}
