use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DevTokenConfig;

/// Payload of a locally minted development token.
///
/// Field names match what the clinic backend issues so the gate reads them
/// the same way.
#[derive(Debug, Serialize, Deserialize)]
pub struct DevClaims {
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl DevClaims {
    pub fn new(
        sub: impl Into<String>,
        role_id: Option<i64>,
        role_name: Option<String>,
        role: Option<String>,
        expiry_hours: u64,
    ) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(JwtError::InvalidExpiry(expiry_hours))?;

        Ok(Self {
            sub: sub.into(),
            role_id,
            role_name,
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(#[from] jsonwebtoken::errors::Error),

    #[error("Dev token secret not configured (set GATE_DEV_TOKEN_SECRET)")]
    InvalidSecret,

    #[error("Dev token expiry of {0} hours is out of range")]
    InvalidExpiry(u64),
}

/// Sign `claims` with HS256 for local testing against the gate
pub fn mint_dev_token(claims: &DevClaims, config: &DevTokenConfig) -> Result<String, JwtError> {
    if config.secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
    Ok(encode(&Header::default(), claims, &encoding_key)?)
}
