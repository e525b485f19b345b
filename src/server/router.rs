use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};

use super::admin::admin_router;
use super::public;
use crate::store::Store;
use crate::types::DEFAULT_TENANT_ID;

/// Shared request state: the store handle plus the tenant context every
/// lookup is scoped to. Injected explicitly; no globals.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tenant_id: String,
    /// Prepended to every generated link, e.g. "/dennis". Empty for
    /// single-tenant deployments.
    pub url_prefix: String,
    pub site_name: String,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tenant_id: Option<String>, url_prefix: String) -> Self {
        Self {
            store,
            tenant_id: tenant_id.unwrap_or_else(|| DEFAULT_TENANT_ID.to_string()),
            url_prefix,
            site_name: "pressman".to_string(),
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(public::home))
        .route("/health", get(health))
        .route("/posts/{slug}", get(public::post))
        .route("/api/posts", get(public::api_posts))
        .route("/api/posts/{slug}", get(public::api_post))
        .route("/site.css", get(public::site_css))
        .route("/site.js", get(public::site_js))
        .nest("/api/admin", admin_router())
        // Static pages match last so /api/* and asset routes win first;
        // a miss here is the terminal 404.
        .route("/{slug}", get(public::static_page))
        .fallback(public::not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
