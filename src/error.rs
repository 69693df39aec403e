// Gate and configuration error types
use axum::http::header::InvalidHeaderValue;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning a gate outcome into an HTTP response.
///
/// These never reach the client. The middleware treats any of them as a
/// reason to let the request through untouched.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Redirect location '{location}' is not a valid header value")]
    InvalidLocation {
        location: String,
        #[source]
        source: InvalidHeaderValue,
    },

    #[error("Failed to build gate response: {0}")]
    Response(#[from] axum::http::Error),
}

/// Errors raised while loading the route table and gate settings at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read route file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid route file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid route rule '{prefix}': {reason}")]
    InvalidRule { prefix: String, reason: String },

    #[error("Invalid public route '{0}': paths must be local, starting with a single '/'")]
    InvalidPublicRoute(String),

    #[error("Invalid {setting} '{value}': must be a local path")]
    InvalidRedirectSetting { setting: &'static str, value: String },
}

impl ConfigError {
    pub fn invalid_rule(prefix: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidRule {
            prefix: prefix.into(),
            reason: reason.into(),
        }
    }
}
