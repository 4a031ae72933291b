use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    extract::Request,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
            ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use tower::Service;
use tower_layer::Layer;

use crate::config::CorsSettings;

const ALLOWED_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";
const WILDCARD: &str = "*";
const PREFLIGHT_VARY: &str = "Origin, Access-Control-Request-Method, Access-Control-Request-Headers";

/// Cross-origin policy, fixed at startup.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_any_origin: bool,
    allowed_origins: Vec<String>,
    allow_credentials: bool,
    max_age_secs: u64,
}

impl From<&CorsSettings> for CorsPolicy {
    fn from(settings: &CorsSettings) -> Self {
        Self {
            allow_any_origin: settings.allowed_origins.iter().any(|o| o == WILDCARD),
            allowed_origins: settings
                .allowed_origins
                .iter()
                .filter(|o| *o != WILDCARD)
                .cloned()
                .collect(),
            allow_credentials: settings.allow_credentials,
            max_age_secs: settings.max_age_secs,
        }
    }
}

impl CorsPolicy {
    pub fn allows(&self, origin: &HeaderValue) -> bool {
        self.allow_any_origin
            || origin
                .to_str()
                .is_ok_and(|origin| self.allowed_origins.iter().any(|o| o == origin))
    }

    // A literal "*" is only valid when the browser is not sending credentials.
    fn echoes_origin(&self) -> bool {
        !self.allow_any_origin || self.allow_credentials
    }

    fn apply_origin(&self, origin: &HeaderValue, headers: &mut HeaderMap) {
        if self.echoes_origin() {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        } else {
            headers.insert(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static(WILDCARD),
            );
        }
        if self.allow_credentials {
            headers.insert(
                ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
    }

    // Responses seen by the policy always vary on the request origin, allowed or not.
    pub fn preflight(&self, origin: &HeaderValue, request_headers: &HeaderMap) -> Response {
        if !self.allows(origin) {
            let mut response = (StatusCode::BAD_REQUEST, "Disallowed CORS origin").into_response();
            response
                .headers_mut()
                .append(VARY, HeaderValue::from_static(PREFLIGHT_VARY));
            return response;
        }

        let mut response = (StatusCode::OK, "OK").into_response();
        let headers = response.headers_mut();
        headers.append(VARY, HeaderValue::from_static(PREFLIGHT_VARY));
        self.apply_origin(origin, headers);
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        if let Some(requested) = request_headers.get(ACCESS_CONTROL_REQUEST_HEADERS) {
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
        }
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(self.max_age_secs));
        response
    }

    pub fn decorate(&self, origin: &HeaderValue, headers: &mut HeaderMap) {
        headers.append(VARY, HeaderValue::from_static("Origin"));
        if self.allows(origin) {
            self.apply_origin(origin, headers);
        }
    }
}

fn is_preflight(request: &Request) -> bool {
    request.method() == Method::OPTIONS
        && request.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD)
}

#[derive(Debug, Clone)]
pub struct CorsLayer {
    policy: Arc<CorsPolicy>,
}

impl CorsLayer {
    pub fn new(policy: CorsPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }
}

impl<S> Layer<S> for CorsLayer {
    type Service = Cors<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Cors {
            inner,
            policy: self.policy.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cors<S> {
    inner: S,
    policy: Arc<CorsPolicy>,
}

impl<S> Service<Request> for Cors<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let Some(origin) = request.headers().get(ORIGIN).cloned() else {
            return Box::pin(self.inner.call(request));
        };

        if is_preflight(&request) {
            let response = self.policy.preflight(&origin, request.headers());
            return Box::pin(async move { Ok(response) });
        }

        let policy = self.policy.clone();
        let future = self.inner.call(request);
        Box::pin(async move {
            let mut response = future.await?;
            policy.decorate(&origin, response.headers_mut());
            Ok(response)
        })
    }
}
