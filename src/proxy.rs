//! Development server: reverse proxy for the backend plus the static bundle
//!
//! Requests under the configured prefixes (`/api`, `/auth`) are forwarded to
//! the backend with method, query, body and headers intact. `Host` is replaced
//! by the backend's, and every `Set-Cookie` comes back unchanged so the
//! browser keeps its session on the dev origin.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::header::{self, HeaderMap, HeaderName},
    response::Response,
    routing::any,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    config::{AppConfig, BackendConfig},
    error::{AppError, AppResult},
};

/// Largest request body forwarded (profile pictures travel as data URLs)
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_forwardable(name: &HeaderName) -> bool {
    name != header::HOST
        && name != header::CONTENT_LENGTH
        && !HOP_BY_HOP.contains(&name.as_str())
}

fn copy_headers(from: &HeaderMap) -> HeaderMap {
    let mut to = HeaderMap::with_capacity(from.len());
    for (name, value) in from {
        if is_forwardable(name) {
            to.append(name.clone(), value.clone());
        }
    }
    to
}

pub struct ProxyState {
    client: reqwest::Client,
    backend: String,
}

impl ProxyState {
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        // Redirects and cookies belong to the browser, not the proxy
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AppError::Config(format!("Proxy client: {}", e)))?;

        Ok(Self {
            client,
            backend: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

async fn forward(State(state): State<Arc<ProxyState>>, request: Request) -> AppResult<Response> {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = format!("{}{}", state.backend, path_and_query);

    let body: Bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::Validation(format!("Unreadable request body: {}", e)))?;

    let mut headers = copy_headers(&parts.headers);
    if let Some(host) = parts.headers.get(header::HOST) {
        headers.insert(HeaderName::from_static("x-forwarded-host"), host.clone());
    }

    tracing::debug!("Proxying {} {}", parts.method, url);
    let upstream = state
        .client
        .request(parts.method.clone(), &url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| AppError::Network(format!("{} {}: {}", parts.method, url, e)))?;

    let status = upstream.status();
    let response_headers = copy_headers(upstream.headers());
    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| AppError::Network(format!("Reading upstream body: {}", e)))?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    if status.is_server_error() {
        tracing::warn!("{} {} -> {}", parts.method, url, status);
    }
    Ok(response)
}

/// Routes for the proxied prefixes, without the static fallback or layers
pub fn proxy_routes(config: &BackendConfig) -> AppResult<Router> {
    let state = Arc::new(ProxyState::new(config)?);

    let mut router = Router::new();
    for prefix in &config.proxy_prefixes {
        let prefix = prefix.trim_end_matches('/');
        if !prefix.starts_with('/') {
            return Err(AppError::Config(format!(
                "Proxy prefix must start with '/': {}",
                prefix
            )));
        }
        router = router
            .route(prefix, any(forward))
            .route(&format!("{}/*rest", prefix), any(forward));
    }
    Ok(router.with_state(state))
}

/// Full dev server app
pub fn create_router(config: &AppConfig) -> AppResult<Router> {
    let mut app = proxy_routes(&config.backend)?;

    if let Some(dir) = &config.server.static_dir {
        let index = Path::new(dir).join("index.html");
        tracing::info!("Serving static files from {} (SPA fallback {})", dir, index.display());
        app = app.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    Ok(app
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive()))
}
