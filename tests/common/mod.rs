#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, Response, Uri},
    routing::get,
    Router,
};
use tower::ServiceExt;

use clinic_gate::auth::{mint_dev_token, DevClaims};
use clinic_gate::config::DevTokenConfig;
use clinic_gate::gate::{Gate, PublicRoutes, RouteTable, DEFAULT_FALLBACK_PATH};
use clinic_gate::server;

pub fn clinic_gate() -> Gate {
    Gate::new(
        PublicRoutes::clinic_defaults(),
        RouteTable::clinic_defaults(DEFAULT_FALLBACK_PATH),
    )
}

/// Gated router whose pages echo their path, plus one API route
pub fn app_with(gate: Gate) -> Router {
    let pages = Router::new()
        .route("/api/citas", get(|| async { "api citas" }))
        .fallback(|uri: Uri| async move { format!("page {}", uri.path()) });

    server::gated(pages, Arc::new(gate))
}

pub fn app() -> Router {
    app_with(clinic_gate())
}

/// Token signed with a throwaway key; the gate never checks it
pub fn token(role_id: Option<i64>, role_name: Option<&str>, role: Option<&str>) -> String {
    let claims = DevClaims::new(
        "test-user",
        role_id,
        role_name.map(str::to_string),
        role.map(str::to_string),
        1,
    )
    .expect("build test claims");
    let config = DevTokenConfig {
        secret: "not-the-backend-secret".to_string(),
        expiry_hours: 1,
    };
    mint_dev_token(&claims, &config).expect("mint test token")
}

pub fn doctor_token() -> String {
    token(Some(3), Some("Medico"), Some("doctor"))
}

pub fn patient_token() -> String {
    token(Some(5), Some("Paciente"), Some("patient"))
}

pub fn get_request(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

pub fn with_cookie(path: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn with_bearer(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Result<Response<Body>> {
    Ok(app.clone().oneshot(request).await?)
}

pub async fn body_text(response: Response<Body>) -> Result<String> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

/// Split a Location header into its path and decoded query pairs
pub fn location_parts(response: &Response<Body>) -> (String, Vec<(String, String)>) {
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("redirect without Location header");
    let (path, query) = location.split_once('?').unwrap_or((location, ""));
    let pairs = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    (path.to_string(), pairs)
}

pub fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}
