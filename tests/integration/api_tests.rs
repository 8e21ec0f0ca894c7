//! API integration tests
//!
//! Each test starts a stub backend on an ephemeral port and drives the real
//! reqwest transport (and, for the proxy tests, the dev server) against it.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};

use lostfound_client::{
    api::ApiClient,
    config::{AppConfig, BackendConfig},
    error::AppError,
    models::{user::LoginRequest, ClaimStatus, ClaimUpdate, ItemQuery, Role},
    proxy,
    services::{
        pages::{load_page, PageLoad, Route},
        Services,
    },
};

const SESSION_COOKIE: &str = "session=stub-session";

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|c| c.contains(SESSION_COOKIE))
}

fn staff_user() -> Value {
    json!({"user_id": 2, "name": "Riley Staff", "email": "rstaff@uwaterloo.ca", "role": "staff"})
}

async fn login() -> Response {
    (
        [(header::SET_COOKIE, format!("{}; Path=/; HttpOnly", SESSION_COOKIE))],
        Json(json!({"message": "Login successful", "user": staff_user()})),
    )
        .into_response()
}

async fn verify_session(headers: HeaderMap) -> Json<Value> {
    if has_session(&headers) {
        Json(json!({"valid": true, "user": staff_user()}))
    } else {
        Json(json!({"valid": false}))
    }
}

async fn me(headers: HeaderMap) -> Response {
    if has_session(&headers) {
        Json(staff_user()).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"error": "Authentication required"}))).into_response()
    }
}

async fn list_items(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    Json(json!({
        "items": [{
            "item_id": 1,
            "name": params.get("search").cloned().unwrap_or_default(),
            "category": params.get("category").cloned().unwrap_or_else(|| "other".into()),
            "status": "unclaimed"
        }],
        "pagination": {"page": page, "page_size": 12, "total_count": 25, "total_pages": 3}
    }))
}

async fn update_claim(Path(claim_id): Path<i64>, Json(body): Json<Value>) -> Response {
    if claim_id == 99 {
        return (
            StatusCode::CONFLICT,
            Json(json!({"error": "Claim was already processed"})),
        )
            .into_response();
    }
    Json(json!({
        "message": "Claim status updated successfully",
        "claim_id": claim_id,
        "new_status": body["status"],
        "item_updated": body["status"] == "picked_up"
    }))
    .into_response()
}

async fn claims_csv() -> Response {
    (
        [(header::CONTENT_TYPE, "text/csv")],
        "claim_id,status\n1,pending\n",
    )
        .into_response()
}

/// Echoes what the backend actually received and sets two cookies
async fn echo(
    method: axum::http::Method,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    body: String,
) -> Response {
    let header_str = |name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    let mut response = Json(json!({
        "method": method.as_str(),
        "host": header_str(header::HOST),
        "cookie": header_str(header::COOKIE),
        "forwarded_host": header_str(header::HeaderName::from_static("x-forwarded-host")),
        "query": params,
        "body": body,
    }))
    .into_response();
    let cookies = response.headers_mut();
    cookies.append(header::SET_COOKIE, "a=1; Path=/".parse().unwrap());
    cookies.append(header::SET_COOKIE, "b=2; Path=/".parse().unwrap());
    response
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

async fn start_backend() -> SocketAddr {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/verify-session", get(verify_session))
        .route("/auth/me", get(me))
        .route("/api/items", get(list_items))
        .route("/api/claims/:id", patch(update_claim))
        .route("/api/export/claims/csv", get(claims_csv))
        .route("/api/echo", get(echo).post(echo));
    serve(app).await
}

fn services_for(backend: SocketAddr) -> Services {
    let config = AppConfig {
        backend: BackendConfig {
            base_url: format!("http://{}", backend),
            ..BackendConfig::default()
        },
        ..AppConfig::default()
    };
    Services::new(&config).expect("services")
}

#[tokio::test]
async fn test_cookie_session_survives_between_calls() {
    let backend = start_backend().await;
    let services = services_for(backend);
    let auth = &services.api.auth;

    let status = assert_ok!(auth.verify_session().await);
    assert!(!status.valid);

    let user = assert_ok!(
        auth.login(&LoginRequest {
            email: "rstaff@uwaterloo.ca".into(),
            password: "secret".into(),
        })
        .await
    );
    assert_eq!(user.role, Role::Staff);

    // The negative result was cached; login must have dropped it
    let status = assert_ok!(auth.verify_session().await);
    assert!(status.valid);
    assert_eq!(assert_ok!(auth.me().await).name, "Riley Staff");
}

#[tokio::test]
async fn test_gated_page_redirects_without_session() {
    let backend = start_backend().await;
    let services = services_for(backend);

    let page: PageLoad<()> = load_page(&services.api.auth, Route::StaffClaims, "Failed", |_| async {
        Ok(())
    })
    .await;
    assert_eq!(page.redirect(), Some(Route::Login));
}

#[tokio::test]
async fn test_item_listing_sends_filters() {
    let backend = start_backend().await;
    let services = services_for(backend);

    let page = assert_ok!(
        services
            .api
            .items
            .list(&ItemQuery {
                search: Some("umbrella".into()),
                page: 2,
                page_size: 12,
                ..ItemQuery::default()
            })
            .await
    );
    assert_eq!(page.info.page, 2);
    assert_eq!(page.info.total_pages, 3);
    assert_eq!(page.rows[0].name.as_deref(), Some("umbrella"));
}

#[tokio::test]
async fn test_error_statuses_carry_server_message() {
    let backend = start_backend().await;
    let services = services_for(backend);
    let update = ClaimUpdate {
        status: ClaimStatus::Approved,
        staff_notes: None,
    };

    let ok = assert_ok!(services.api.claims.update_status(5, &update).await);
    assert_eq!(ok.new_status, Some(ClaimStatus::Approved));

    let err = assert_err!(services.api.claims.update_status(99, &update).await);
    assert_eq!(err, AppError::Conflict("Claim was already processed".into()));

    let err = assert_err!(services.api.auth.me().await);
    assert!(err.is_unauthenticated());
}

#[tokio::test]
async fn test_network_failure_is_connectivity_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let services = services_for(addr);
    let err = assert_err!(services.api.auth.me().await);
    assert!(matches!(err, AppError::Network(_)));
    assert_eq!(
        err.user_message("ignored"),
        lostfound_client::error::CONNECTIVITY_MESSAGE
    );
}

#[tokio::test]
async fn test_csv_download_is_saved_with_dated_name() {
    let backend = start_backend().await;
    let services = services_for(backend);
    let dir = tempfile::tempdir().unwrap();

    let export = assert_ok!(
        services
            .api
            .export
            .claims_csv(Some(ClaimStatus::Pending))
            .await
    );
    assert!(export.filename.starts_with("claims_pending_"));
    assert!(export.filename.ends_with(".csv"));

    let path = assert_ok!(export.save_to(dir.path()).await);
    let written = tokio::fs::read_to_string(path).await.unwrap();
    assert_eq!(written, "claim_id,status\n1,pending\n");
}

#[tokio::test]
async fn test_proxy_forwards_requests_and_cookies() {
    let backend = start_backend().await;
    let config = AppConfig {
        backend: BackendConfig {
            base_url: format!("http://{}", backend),
            ..BackendConfig::default()
        },
        ..AppConfig::default()
    };
    let dev = serve(proxy::create_router(&config).unwrap()).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/echo?status=pending&page=2", dev))
        .header(header::COOKIE, SESSION_COOKIE)
        .body("hello")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let cookies: Vec<_> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cookies, vec!["a=1; Path=/", "b=2; Path=/"]);

    let echoed: Value = response.json().await.unwrap();
    assert_eq!(echoed["method"], "POST");
    assert_eq!(echoed["host"], backend.to_string());
    assert_eq!(echoed["forwarded_host"], dev.to_string());
    assert_eq!(echoed["cookie"], SESSION_COOKIE);
    assert_eq!(echoed["query"]["status"], "pending");
    assert_eq!(echoed["body"], "hello");
}

#[tokio::test]
async fn test_proxy_reports_bad_gateway_when_backend_is_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = listener.local_addr().unwrap();
    drop(listener);

    let config = AppConfig {
        backend: BackendConfig {
            base_url: format!("http://{}", dead),
            ..BackendConfig::default()
        },
        ..AppConfig::default()
    };
    let dev = serve(proxy::create_router(&config).unwrap()).await;

    let response = reqwest::get(format!("http://{}/auth/verify-session", dev))
        .await
        .unwrap();
    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 502);
}
