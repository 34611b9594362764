//! Response hardening layer: a fixed set of security headers stamped onto
//! every response. The set is computed once at startup; HSTS joins it only
//! when the service believes it is behind TLS.

use std::sync::Arc;
use std::task::{Context, Poll};
use std::{env, future::Future, pin::Pin};

use axum::http::{HeaderName, HeaderValue, Request, Response};
use tower::{Layer, Service};

const HSTS: (&str, &str) = (
    "strict-transport-security",
    "max-age=31536000; includeSubDomains",
);

/// Headers applied unconditionally. This is an API, so the CSP denies
/// everything and forbids framing.
const BASE_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    (
        "content-security-policy",
        "default-src 'none'; frame-ancestors 'none'",
    ),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    (
        "permissions-policy",
        "geolocation=(), microphone=(), camera=()",
    ),
];

#[derive(Clone)]
pub struct SecurityHeadersLayer {
    headers: Arc<[(HeaderName, HeaderValue)]>,
}

impl SecurityHeadersLayer {
    pub fn new(include_hsts: bool) -> Self {
        let mut pairs: Vec<(HeaderName, HeaderValue)> = BASE_HEADERS
            .iter()
            .map(|(name, value)| {
                (
                    HeaderName::from_static(name),
                    HeaderValue::from_static(value),
                )
            })
            .collect();
        if include_hsts {
            pairs.push((
                HeaderName::from_static(HSTS.0),
                HeaderValue::from_static(HSTS.1),
            ));
        }
        Self {
            headers: pairs.into(),
        }
    }

    /// HSTS is only meaningful over HTTPS, so it keys off the deployment
    /// environment rather than being always-on.
    pub fn from_env() -> Self {
        let production = env::var("RUST_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        if production {
            tracing::info!("Security headers: HSTS enabled (production)");
        } else {
            tracing::info!("Security headers: HSTS disabled (development)");
        }

        Self::new(production)
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeadersService {
            inner,
            headers: Arc::clone(&self.headers),
        }
    }
}

#[derive(Clone)]
pub struct SecurityHeadersService<S> {
    inner: S,
    headers: Arc<[(HeaderName, HeaderValue)]>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for SecurityHeadersService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = SecurityHeadersFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        SecurityHeadersFuture {
            future: self.inner.call(request),
            headers: Arc::clone(&self.headers),
        }
    }
}

#[pin_project::pin_project]
pub struct SecurityHeadersFuture<F> {
    #[pin]
    future: F,
    headers: Arc<[(HeaderName, HeaderValue)]>,
}

impl<F, ResBody, E> Future for SecurityHeadersFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = Result<Response<ResBody>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        this.future.poll(cx).map_ok(|mut response| {
            for (name, value) in this.headers.iter() {
                response.headers_mut().insert(name.clone(), value.clone());
            }
            response
        })
    }
}

pub fn create_security_headers_layer() -> SecurityHeadersLayer {
    SecurityHeadersLayer::from_env()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsts_only_present_when_requested() {
        let without = SecurityHeadersLayer::new(false);
        assert!(!without
            .headers
            .iter()
            .any(|(name, _)| name.as_str() == HSTS.0));

        let with = SecurityHeadersLayer::new(true);
        assert!(with.headers.iter().any(|(name, _)| name.as_str() == HSTS.0));
    }

    #[test]
    fn test_base_headers_are_valid_statics() {
        // from_static panics on invalid names/values; building the layer
        // exercises every entry.
        let layer = SecurityHeadersLayer::new(true);
        assert_eq!(layer.headers.len(), BASE_HEADERS.len() + 1);
    }
}
