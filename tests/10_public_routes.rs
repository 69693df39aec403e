mod common;

use anyhow::Result;
use axum::http::{header, StatusCode};
use clinic_gate::middleware::NO_STORE_CACHE_CONTROL;

#[tokio::test]
async fn login_page_is_reachable_without_session() -> Result<()> {
    let app = common::app();

    let res = common::send(&app, common::get_request("/login")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CACHE_CONTROL], NO_STORE_CACHE_CONTROL);
    assert_eq!(res.headers()[header::PRAGMA], "no-cache");
    assert_eq!(res.headers()[header::EXPIRES], "0");
    assert_eq!(common::body_text(res).await?, "page /login");
    Ok(())
}

#[tokio::test]
async fn public_sub_paths_pass_regardless_of_token() -> Result<()> {
    let app = common::app();

    for request in [
        common::get_request("/reset-password/tok123"),
        common::with_bearer("/reset-password/tok123", &common::patient_token()),
        common::with_cookie("/reset-password/tok123", "access_token=garbage"),
    ] {
        let res = common::send(&app, request).await?;
        assert_eq!(res.status(), StatusCode::OK);
    }
    Ok(())
}

#[tokio::test]
async fn root_is_public_but_unlisted_pages_are_not() -> Result<()> {
    let app = common::app();

    let res = common::send(&app, common::get_request("/")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = common::send(&app, common::get_request("/x")).await?;
    assert_eq!(res.status(), StatusCode::FOUND);
    let (path, query) = common::location_parts(&res);
    assert_eq!(path, "/login");
    assert_eq!(query, vec![common::pair("redirect", "/x")]);
    Ok(())
}

#[tokio::test]
async fn assets_and_api_skip_the_gate() -> Result<()> {
    let app = common::app();

    let res = common::send(&app, common::get_request("/api/citas")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get(header::CACHE_CONTROL).is_none());
    assert_eq!(common::body_text(res).await?, "api citas");

    for path in ["/logo.svg", "/images/hero.webp", "/_next/static/chunks/main.js", "/favicon.ico"] {
        let res = common::send(&app, common::get_request(path)).await?;
        assert_eq!(res.status(), StatusCode::OK, "{path} should bypass the gate");
        assert!(res.headers().get(header::CACHE_CONTROL).is_none());
    }
    Ok(())
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = common::app();

    let res = common::send(&app, common::get_request("/health")).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&common::body_text(res).await?)?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["route_rules"], 6);
    Ok(())
}
