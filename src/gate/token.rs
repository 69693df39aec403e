//! Bearer token lookup and claim decoding.
//!
//! Tokens are decoded WITHOUT signature verification. The claims only steer
//! which page a browser is sent to; the backend API re-checks every request
//! with a verified token. Adding verification here would change which users
//! get redirected, so it is intentionally absent.

use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::{alphabet, Engine as _};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const DEFAULT_TOKEN_COOKIE: &str = "access_token";
pub const LEGACY_TOKEN_COOKIE: &str = "token";

// Standard alphabet after the url-safe substitution. Trailing bits are
// tolerated since some issuers do not zero them.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Role identifiers read from a token payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionClaims {
    pub role_id: Option<i64>,
    pub role_name: Option<String>,
    pub role_enum: Option<String>,
}

impl SessionClaims {
    fn from_payload(payload: &Map<String, Value>) -> Self {
        Self {
            role_id: payload.get("role_id").and_then(integral),
            role_name: payload
                .get("role_name")
                .and_then(Value::as_str)
                .map(str::to_string),
            role_enum: payload
                .get("role")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// The parts of a request the gate looks at.
///
/// Header names are stored lowercase. For repeated cookies the first one wins.
#[derive(Debug, Clone, Default)]
pub struct RequestView {
    pub path: String,
    cookies: BTreeMap<String, String>,
    headers: BTreeMap<String, String>,
}

impl RequestView {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_cookie(name.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert_header(name.as_ref(), value.into());
        self
    }

    /// Add every pair of a raw `Cookie` header
    pub fn with_cookie_header(mut self, raw: &str) -> Self {
        for pair in raw.split(';') {
            if let Some((name, value)) = pair.split_once('=') {
                let name = name.trim();
                if !name.is_empty() {
                    self.insert_cookie(name.to_string(), value.trim().to_string());
                }
            }
        }
        self
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn insert_cookie(&mut self, name: String, value: String) {
        self.cookies.entry(name).or_insert(value);
    }

    fn insert_header(&mut self, name: &str, value: String) {
        self.headers
            .entry(name.to_ascii_lowercase())
            .or_insert(value);
    }
}

/// Cookie names searched for the access token, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSources {
    pub cookie: String,
    pub legacy_cookie: String,
}

impl Default for TokenSources {
    fn default() -> Self {
        Self {
            cookie: DEFAULT_TOKEN_COOKIE.to_string(),
            legacy_cookie: LEGACY_TOKEN_COOKIE.to_string(),
        }
    }
}

impl TokenSources {
    /// Primary cookie, then the legacy cookie, then `Authorization: Bearer`
    pub fn find<'a>(&self, request: &'a RequestView) -> Option<&'a str> {
        request
            .cookie(&self.cookie)
            .filter(|t| !t.is_empty())
            .or_else(|| request.cookie(&self.legacy_cookie).filter(|t| !t.is_empty()))
            .or_else(|| {
                request
                    .header("authorization")
                    .and_then(|h| h.strip_prefix("Bearer "))
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
            })
    }
}

/// Decode the payload segment of a JWT-shaped token.
///
/// Returns `None` for anything that is not three dot-separated parts with a
/// base64url JSON object in the middle. The signature is never checked.
pub fn decode_claims(token: &str) -> Option<SessionClaims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let mut payload = parts[1].replace('-', "+").replace('_', "/");
    while payload.len() % 4 != 0 {
        payload.push('=');
    }

    let bytes = PAYLOAD_ENGINE.decode(payload.as_bytes()).ok()?;
    let value: Value = serde_json::from_slice(&bytes).ok()?;

    value.as_object().map(SessionClaims::from_payload)
}

/// Find the request's token and decode its claims.
///
/// A panic anywhere in decoding is absorbed and reads as "no session", never
/// as an authenticated one.
pub fn read_claims(request: &RequestView, sources: &TokenSources) -> Option<SessionClaims> {
    let token = sources.find(request)?;
    super::unwind::absorb(|| decode_claims(token)).flatten()
}
