//! Read-through response cache middleware.
//!
//! GET requests on routes listed in the [`CachePolicy`] are answered from the
//! cache when possible. On a miss the request runs normally; a `200 OK` JSON
//! response is buffered, written back under the request's key, and returned.
//! Cache failures are logged and never change the response.

use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{MatchedPath, OriginalUri},
    http::{HeaderValue, Method, Request, Response, StatusCode, header},
    response::IntoResponse,
};
use roster_cache::{CacheHandle, CacheKey, Namespace};
use tower::{Layer, Service};
use tracing::{debug, warn};

use super::policy::CachePolicy;
use crate::metrics::CacheMetrics;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Shared state of the read-through layer.
#[derive(Clone)]
struct ReadThrough {
    cache: CacheHandle,
    namespace: Namespace,
    policy: Arc<CachePolicy>,
    metrics: CacheMetrics,
}

/// Layer that puts the read-through cache in front of routed handlers.
///
/// Apply it with `Router::route_layer` so the matched route template is
/// known when the TTL is looked up.
#[derive(Clone)]
pub struct ReadThroughLayer {
    shared: ReadThrough,
}

impl ReadThroughLayer {
    pub fn new(
        cache: CacheHandle,
        namespace: Namespace,
        policy: CachePolicy,
        metrics: CacheMetrics,
    ) -> Self {
        Self {
            shared: ReadThrough {
                cache,
                namespace,
                policy: Arc::new(policy),
                metrics,
            },
        }
    }
}

impl<S> Layer<S> for ReadThroughLayer {
    type Service = ReadThroughMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ReadThroughMiddleware {
            inner,
            shared: self.shared.clone(),
        }
    }
}

/// Middleware produced by [`ReadThroughLayer`].
#[derive(Clone)]
pub struct ReadThroughMiddleware<S> {
    inner: S,
    shared: ReadThrough,
}

impl<S> Service<Request<Body>> for ReadThroughMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let Some(ttl) = self.shared.ttl_for(&request) else {
            return Box::pin(self.inner.call(request));
        };

        let key = self.shared.key_for(&request);
        let shared = self.shared.clone();

        // Keep the instance that was polled ready
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            if let Some(payload) = shared.lookup(&key).await {
                return Ok(cached_response(payload));
            }

            let response = inner.call(request).await?;
            Ok(shared.capture(&key, ttl, response).await)
        })
    }
}

impl ReadThrough {
    fn ttl_for(&self, request: &Request<Body>) -> Option<Duration> {
        if request.method() != Method::GET {
            return None;
        }
        let route = request.extensions().get::<MatchedPath>()?;
        self.policy.ttl_for(route.as_str())
    }

    /// Key from the full request target, query string included.
    fn key_for(&self, request: &Request<Body>) -> CacheKey {
        let uri = request
            .extensions()
            .get::<OriginalUri>()
            .map(|original| &original.0)
            .unwrap_or_else(|| request.uri());
        let target = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        self.namespace.key(target)
    }

    async fn lookup(&self, key: &CacheKey) -> Option<String> {
        let start = Instant::now();
        let result = self.cache.get(key.as_str()).await;
        self.metrics
            .record_operation_duration("get", start.elapsed());

        match result {
            Ok(Some(payload)) if is_json(&payload) => {
                self.metrics.record_hit();
                debug!(key = %key, "Cache hit");
                Some(payload)
            },
            Ok(Some(_)) => {
                self.metrics.record_miss();
                warn!(key = %key, "Ignoring cached payload that is not valid JSON");
                None
            },
            Ok(None) => {
                self.metrics.record_miss();
                debug!(key = %key, "Cache miss");
                None
            },
            Err(error) => {
                self.metrics.record_error("get");
                self.metrics.record_miss();
                warn!(key = %key, error = %error, "Cache lookup failed, treating as miss");
                None
            },
        }
    }

    /// Buffers a successful JSON response, writes it back, and rebuilds it.
    async fn capture(&self, key: &CacheKey, ttl: Duration, response: Response<Body>) -> Response<Body> {
        if response.status() != StatusCode::OK || !has_json_content_type(&response) {
            return response;
        }

        let (parts, body) = response.into_parts();
        let bytes = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(key = %key, error = %error, "Failed to buffer response body");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            },
        };

        match std::str::from_utf8(&bytes) {
            Ok(payload) => self.write_back(key, payload, ttl).await,
            Err(_) => debug!(key = %key, "Response body is not UTF-8, not cached"),
        }

        Response::from_parts(parts, Body::from(bytes))
    }

    async fn write_back(&self, key: &CacheKey, payload: &str, ttl: Duration) {
        let start = Instant::now();
        match self.cache.set(key.as_str(), payload, Some(ttl)).await {
            Ok(()) => {
                self.metrics.record_write();
                debug!(key = %key, ttl_secs = ttl.as_secs(), "Response cached");
            },
            Err(error) => {
                self.metrics.record_error("set");
                warn!(key = %key, error = %error, "Cache write-back failed");
            },
        }
        self.metrics
            .record_operation_duration("set", start.elapsed());
    }
}

fn is_json(payload: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(payload).is_ok()
}

fn has_json_content_type(response: &Response<Body>) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with(JSON_CONTENT_TYPE))
}

fn cached_response(payload: String) -> Response<Body> {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        )],
        payload,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_json() {
        assert!(is_json(r#"{"id":"1"}"#));
        assert!(is_json("[]"));
        assert!(!is_json("{not json"));
        assert!(!is_json(""));
    }

    #[test]
    fn test_cached_response_is_json_ok() {
        let response = cached_response("[]".to_string());

        assert_eq!(response.status(), StatusCode::OK);
        assert!(has_json_content_type(&response));
    }

    #[test]
    fn test_key_uses_path_and_query() {
        let layer = ReadThroughLayer::new(
            CacheHandle::fallback(),
            Namespace::new("students").unwrap(),
            CachePolicy::new(),
            CacheMetrics::new(),
        );
        let request = Request::builder()
            .uri("/api/students?grade=5")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            layer.shared.key_for(&request).as_str(),
            "students:/api/students?grade=5"
        );
    }

    #[test]
    fn test_ttl_requires_get_and_listed_route() {
        let layer = ReadThroughLayer::new(
            CacheHandle::fallback(),
            Namespace::new("students").unwrap(),
            CachePolicy::new().route("/api/students", Duration::from_secs(60)),
            CacheMetrics::new(),
        );

        // No MatchedPath extension: not routed, not cached
        let unrouted = Request::builder()
            .uri("/api/students")
            .body(Body::empty())
            .unwrap();
        assert!(layer.shared.ttl_for(&unrouted).is_none());

        let post = Request::builder()
            .method(Method::POST)
            .uri("/api/students")
            .body(Body::empty())
            .unwrap();
        assert!(layer.shared.ttl_for(&post).is_none());
    }
}
