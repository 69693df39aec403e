use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};

use crate::error::GateError;

pub const NO_STORE_CACHE_CONTROL: &str =
    "no-store, no-cache, must-revalidate, proxy-revalidate, max-age=0";

/// Keep gated pages out of browser and proxy caches, so a page rendered for
/// one session is never replayed after logout or a role change
pub fn apply_no_store(headers: &mut HeaderMap) {
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE_CACHE_CONTROL));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
}

/// 302 to `location`, itself marked no-store
pub fn redirect_response(location: &str) -> Result<Response, GateError> {
    let value = HeaderValue::from_str(location).map_err(|source| GateError::InvalidLocation {
        location: location.to_string(),
        source,
    })?;

    let mut response = Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, value)
        .body(Body::empty())?;
    apply_no_store(response.headers_mut());

    Ok(response)
}
